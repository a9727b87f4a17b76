//! Data Model: PunishmentRecord, ModificationEvent
//!
//! These are the typed shapes produced once at the fetch boundary. Field
//! names follow the panel API (camelCase) and accept the legacy aliases
//! (`issued`, `started`, `expires`, `status`) older records still carry.

use crate::duration::PunishmentDuration;
use crate::timestamp::{self, Timestamp};
use serde::{Deserialize, Serialize};

/// An issued disciplinary action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunishmentRecord {
    /// Unique punishment id
    pub id: String,

    /// Key into the punishment type catalog
    #[serde(alias = "type")]
    pub type_ordinal: u32,

    /// When the punishment was created
    #[serde(alias = "issued", with = "timestamp::lenient", default)]
    pub issued_at: Option<Timestamp>,

    /// When enforcement began; `None` means unstarted
    #[serde(alias = "started", with = "timestamp::lenient", default)]
    pub started_at: Option<Timestamp>,

    /// Expiry as originally issued
    #[serde(alias = "expires", with = "timestamp::lenient", default)]
    pub expires_at: Option<Timestamp>,

    /// Original duration
    #[serde(default)]
    pub duration: PunishmentDuration,

    /// Severity tier label (`low|regular|severe` or a synonym)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Offense level label (`first|medium|habitual`)
    #[serde(alias = "status", default, skip_serializing_if = "Option::is_none")]
    pub offense_level: Option<String>,

    /// Issuance flag; superseded by the replayed effective state
    #[serde(default)]
    pub active: bool,

    /// Staff member who issued the punishment
    #[serde(alias = "issuer", default, skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,

    /// Amendments in insertion order (not trusted for ordering)
    #[serde(default)]
    pub modifications: Vec<ModificationEvent>,

    #[serde(default)]
    pub evidence: Vec<serde_json::Value>,

    #[serde(default)]
    pub notes: Vec<serde_json::Value>,

    #[serde(default)]
    pub attached_ticket_ids: Vec<String>,
}

impl PunishmentRecord {
    /// Create a bare record, as issued, with no modifications.
    pub fn new(id: impl Into<String>, type_ordinal: u32, issued_at: Timestamp) -> Self {
        Self {
            id: id.into(),
            type_ordinal,
            issued_at: Some(issued_at),
            started_at: None,
            expires_at: None,
            duration: PunishmentDuration::Permanent,
            severity: None,
            offense_level: None,
            active: true,
            issuer_name: None,
            modifications: Vec::new(),
            evidence: Vec::new(),
            notes: Vec::new(),
            attached_ticket_ids: Vec::new(),
        }
    }

    /// Mark the punishment as started and derive the original expiry from its duration.
    pub fn started(mut self, started_at: Timestamp) -> Self {
        self.started_at = Some(started_at);
        self.expires_at = self.duration.expiry_from(started_at);
        self
    }

    pub fn with_duration(mut self, duration: PunishmentDuration) -> Self {
        self.duration = duration;
        if let Some(started_at) = self.started_at {
            self.expires_at = duration.expiry_from(started_at);
        }
        self
    }

    pub fn with_expiry(mut self, expires_at: Option<Timestamp>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    pub fn with_offense_level(mut self, offense_level: impl Into<String>) -> Self {
        self.offense_level = Some(offense_level.into());
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer_name = Some(issuer.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Append a modification event.
    pub fn modified(mut self, event: ModificationEvent) -> Self {
        self.modifications.push(event);
        self
    }

    /// Start of the enforcement window: `started_at`, falling back to `issued_at`.
    pub fn anchor(&self) -> Option<Timestamp> {
        self.started_at.or(self.issued_at)
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whether any pardon or accepted appeal exists, timed or not.
    pub fn is_pardoned(&self) -> bool {
        self.modifications.iter().any(|m| m.kind.is_pardon())
    }

    /// Parse a player's punishment list from the panel API JSON.
    pub fn list_from_json(json: &str) -> crate::error::Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// An append-only amendment to a punishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationEvent {
    #[serde(flatten)]
    pub kind: ModificationKind,

    /// When the amendment was issued; `None` if missing or malformed
    #[serde(alias = "issued", with = "timestamp::lenient", default)]
    pub issued_at: Option<Timestamp>,

    #[serde(default)]
    pub issuer_name: String,

    #[serde(default)]
    pub reason: String,
}

impl ModificationEvent {
    pub fn new(kind: ModificationKind, issued_at: Timestamp) -> Self {
        Self {
            kind,
            issued_at: Some(issued_at),
            issuer_name: String::new(),
            reason: String::new(),
        }
    }

    pub fn pardon(issued_at: Timestamp) -> Self {
        Self::new(ModificationKind::ManualPardon, issued_at)
    }

    pub fn appeal_accept(issued_at: Timestamp) -> Self {
        Self::new(ModificationKind::AppealAccept, issued_at)
    }

    pub fn duration_change(effective_duration: PunishmentDuration, issued_at: Timestamp) -> Self {
        Self::new(
            ModificationKind::ManualDurationChange { effective_duration },
            issued_at,
        )
    }

    pub fn by(mut self, issuer: impl Into<String>) -> Self {
        self.issuer_name = issuer.into();
        self
    }

    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Drop the timestamp, as upstream does for some legacy events.
    pub fn untimed(mut self) -> Self {
        self.issued_at = None;
        self
    }
}

/// The closed set of amendment kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModificationKind {
    ManualPardon,
    AppealAccept,
    ManualDurationChange {
        #[serde(rename = "effectiveDuration", default)]
        effective_duration: PunishmentDuration,
    },
    SetAltBlockingTrue,
    SetAltBlockingFalse,
    SetWipingTrue,
    SetWipingFalse,
}

impl ModificationKind {
    /// Pardons and accepted appeals end a punishment for good.
    pub fn is_pardon(&self) -> bool {
        matches!(self, ModificationKind::ManualPardon | ModificationKind::AppealAccept)
    }

    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModificationKind::ManualPardon => "MANUAL_PARDON",
            ModificationKind::AppealAccept => "APPEAL_ACCEPT",
            ModificationKind::ManualDurationChange { .. } => "MANUAL_DURATION_CHANGE",
            ModificationKind::SetAltBlockingTrue => "SET_ALT_BLOCKING_TRUE",
            ModificationKind::SetAltBlockingFalse => "SET_ALT_BLOCKING_FALSE",
            ModificationKind::SetWipingTrue => "SET_WIPING_TRUE",
            ModificationKind::SetWipingFalse => "SET_WIPING_FALSE",
        }
    }
}

impl std::fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
