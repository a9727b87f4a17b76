//! Presentation helpers for the panel views
//!
//! Badges, duration text and per-row summaries. Everything here is derived
//! from the engine's outputs; none of it feeds back into classification.

use crate::activity::is_active;
use crate::catalog::PunishmentCatalog;
use crate::replay::{replay, EffectiveState};
use crate::status::StatusLevel;
use chrono::Duration;
use modpanel_core::{DurationSpec, PunishmentDuration, PunishmentRecord, SeverityTier, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Badge shown next to a punishment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PunishmentBadge {
    Active,
    Inactive,
    Unstarted,
}

impl fmt::Display for PunishmentBadge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PunishmentBadge::Active => write!(f, "Active"),
            PunishmentBadge::Inactive => write!(f, "Inactive"),
            PunishmentBadge::Unstarted => write!(f, "Unstarted"),
        }
    }
}

/// Pick the badge for a punishment. Unstarted is decided before activity;
/// a pardoned punishment that never started reads as inactive.
pub fn badge(record: &PunishmentRecord, state: &EffectiveState, now: Timestamp) -> PunishmentBadge {
    if !record.is_started() && !record.is_pardoned() {
        return PunishmentBadge::Unstarted;
    }
    if is_active(record, state, now) {
        PunishmentBadge::Active
    } else {
        PunishmentBadge::Inactive
    }
}

/// Render a span compactly, largest two units: `7d`, `1d 12h`, `30m`, `45s`.
pub fn format_span(span: Duration) -> String {
    let total = span.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m"), (seconds, "s")]
        .iter()
        .skip_while(|(value, _)| *value == 0)
        .take(2)
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

/// Human-readable duration, `Permanent` for every permanent encoding.
pub fn format_duration(duration: PunishmentDuration) -> String {
    match duration.to_chrono() {
        None => "Permanent".to_string(),
        Some(span) => format_span(span),
    }
}

/// Expiry line under a punishment.
pub fn expiry_text(state: &EffectiveState, now: Timestamp) -> String {
    match state.expires_at {
        None => "Permanent".to_string(),
        Some(expires_at) if expires_at > now => format!("Expires in {}", format_span(expires_at - now)),
        Some(expires_at) => format!("Expired {} ago", format_span(now - expires_at)),
    }
}

/// Configured duration a new punishment would get at the player's current level.
pub fn suggested_duration(
    catalog: &PunishmentCatalog,
    ordinal: u32,
    severity: Option<SeverityTier>,
    level: StatusLevel,
) -> Option<DurationSpec> {
    catalog.get(ordinal)?.duration_for(severity, level.offense_level())
}

/// One row of a player's punishment list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunishmentSummary {
    pub id: String,
    pub type_name: String,
    pub badge: PunishmentBadge,
    pub duration_text: String,
    pub expiry_text: String,
    pub expires_at: Option<Timestamp>,
    pub points: u32,
    pub modified: bool,
}

impl PunishmentSummary {
    /// Build the row for `record` as of `now`.
    pub fn build(record: &PunishmentRecord, catalog: &PunishmentCatalog, now: Timestamp) -> Self {
        let state = replay(record);
        let points = catalog
            .get(record.type_ordinal)
            .filter(|ty| !ty.is_administrative())
            .map(|ty| ty.points_for(record.severity.as_deref()))
            .unwrap_or(0);

        Self {
            id: record.id.clone(),
            type_name: catalog.display_name(record.type_ordinal),
            badge: badge(record, &state, now),
            duration_text: format_duration(state.duration),
            expiry_text: expiry_text(&state, now),
            expires_at: state.expires_at,
            points,
            modified: state.has_modifications,
        }
    }
}

/// Summaries for a whole punishment list, in the given order.
pub fn summarize(punishments: &[PunishmentRecord], catalog: &PunishmentCatalog, now: Timestamp) -> Vec<PunishmentSummary> {
    punishments
        .iter()
        .map(|record| PunishmentSummary::build(record, catalog, now))
        .collect()
}
