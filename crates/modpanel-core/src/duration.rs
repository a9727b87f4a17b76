//! Punishment durations
//!
//! Upstream encodes "permanent" in several ways (`0`, `-1`, any negative
//! number, `null`, and occasionally NaN from broken arithmetic). All of them
//! collapse into [`PunishmentDuration::Permanent`] here, once, at the
//! deserialization boundary.

use crate::timestamp::Timestamp;
use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire value used when serializing a permanent duration.
pub const PERMANENT_SENTINEL_MS: i64 = -1;

/// A normalized punishment duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PunishmentDuration {
    /// Never expires on its own
    #[default]
    Permanent,
    /// Strictly positive length in milliseconds
    Fixed(i64),
}

impl PunishmentDuration {
    /// Normalize an integer millisecond value.
    pub fn from_millis(ms: i64) -> Self {
        if ms > 0 {
            PunishmentDuration::Fixed(ms)
        } else {
            PunishmentDuration::Permanent
        }
    }

    /// Normalize a floating millisecond value (NaN and infinities are permanent).
    pub fn from_millis_f64(ms: f64) -> Self {
        if ms.is_finite() && ms >= 1.0 && ms <= i64::MAX as f64 {
            PunishmentDuration::Fixed(ms as i64)
        } else {
            PunishmentDuration::Permanent
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, PunishmentDuration::Permanent)
    }

    /// Milliseconds, or `None` when permanent.
    pub fn as_millis(&self) -> Option<i64> {
        match self {
            PunishmentDuration::Permanent => None,
            PunishmentDuration::Fixed(ms) => Some(*ms),
        }
    }

    /// Milliseconds using the wire sentinel for permanent.
    pub fn to_wire(&self) -> i64 {
        self.as_millis().unwrap_or(PERMANENT_SENTINEL_MS)
    }

    /// As a chrono duration, `None` when permanent.
    pub fn to_chrono(&self) -> Option<Duration> {
        self.as_millis().map(Duration::milliseconds)
    }

    /// Expiry for a punishment enforced from `start`. `None` when permanent or
    /// when the end lies past the representable range.
    pub fn expiry_from(&self, start: Timestamp) -> Option<Timestamp> {
        self.to_chrono()
            .and_then(|length| start.checked_add_signed(length))
    }
}

impl From<Duration> for PunishmentDuration {
    fn from(value: Duration) -> Self {
        PunishmentDuration::from_millis(value.num_milliseconds())
    }
}

impl fmt::Display for PunishmentDuration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PunishmentDuration::Permanent => write!(f, "permanent"),
            PunishmentDuration::Fixed(ms) => write!(f, "{}ms", ms),
        }
    }
}

impl Serialize for PunishmentDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.to_wire())
    }
}

impl<'de> Deserialize<'de> for PunishmentDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DurationInput {
            Integer(i64),
            Float(f64),
            Text(String),
            Other(serde_json::Value),
        }

        let duration = match Option::<DurationInput>::deserialize(deserializer)? {
            Some(DurationInput::Integer(ms)) => PunishmentDuration::from_millis(ms),
            Some(DurationInput::Float(ms)) => PunishmentDuration::from_millis_f64(ms),
            Some(DurationInput::Text(raw)) => raw
                .trim()
                .parse::<f64>()
                .map(PunishmentDuration::from_millis_f64)
                .unwrap_or_default(),
            Some(DurationInput::Other(_)) | None => PunishmentDuration::Permanent,
        };
        Ok(duration)
    }
}
