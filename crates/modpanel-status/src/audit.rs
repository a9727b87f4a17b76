//! Moderation audit trail
//!
//! Flattens every modification across a set of punishments into one
//! staff-facing feed for the audit and rollback dashboard. Untimed events
//! are listed here even though replay ignores them.

use chrono::{DateTime, Duration, Utc};
use modpanel_core::{ModificationKind, PunishmentDuration, PunishmentRecord, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// `<punishment id>#<index in its modification list>`
    pub id: String,

    pub punishment_id: String,

    pub type_ordinal: u32,

    pub kind: ModificationKind,

    /// Staff member who made the change
    pub issuer: String,

    pub reason: String,

    /// `None` when the upstream timestamp was missing or malformed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<Timestamp>,

    /// New duration for duration changes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_duration: Option<PunishmentDuration>,
}

impl AuditEntry {
    pub fn is_pardon(&self) -> bool {
        self.kind.is_pardon()
    }
}

/// Audit log collector
#[derive(Debug, Clone)]
pub struct ModerationAuditLog {
    entries: Vec<AuditEntry>,
    max_entries: usize,
}

impl ModerationAuditLog {
    /// Create a new audit log
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_entries: 10_000,
        }
    }

    /// Create with a custom max size
    pub fn with_max_entries(max: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max,
        }
    }

    /// Build the trail for a set of punishments
    pub fn from_punishments(punishments: &[PunishmentRecord]) -> Self {
        let mut log = Self::new();
        log.record_all(punishments);
        log
    }

    /// Add every modification of `record`.
    pub fn record(&mut self, record: &PunishmentRecord) {
        self.push_entries(record);
        self.normalize();
    }

    /// Add every modification of every record, ordering the trail once.
    pub fn record_all(&mut self, punishments: &[PunishmentRecord]) {
        for record in punishments {
            self.push_entries(record);
        }
        self.normalize();
    }

    fn push_entries(&mut self, record: &PunishmentRecord) {
        for (index, event) in record.modifications.iter().enumerate() {
            let effective_duration = match event.kind {
                ModificationKind::ManualDurationChange { effective_duration } => Some(effective_duration),
                _ => None,
            };
            self.entries.push(AuditEntry {
                id: format!("{}#{}", record.id, index),
                punishment_id: record.id.clone(),
                type_ordinal: record.type_ordinal,
                kind: event.kind,
                issuer: event.issuer_name.clone(),
                reason: event.reason.clone(),
                issued_at: event.issued_at,
                effective_duration,
            });
        }
    }

    /// Newest first, untimed last; keep only the newest `max_entries`.
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| match (a.issued_at, b.issued_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        self.entries.truncate(self.max_entries);
    }

    /// Get all entries
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Entries issued at or after `since`
    pub fn entries_since(&self, since: Timestamp) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.issued_at.is_some_and(|at| at >= since))
            .collect()
    }

    /// Entries made by one staff member (case-insensitive)
    pub fn entries_by_issuer(&self, issuer: &str) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.issuer.eq_ignore_ascii_case(issuer))
            .collect()
    }

    pub fn entries_for_punishment(&self, punishment_id: &str) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.punishment_id == punishment_id)
            .collect()
    }

    /// Pardons and accepted appeals
    pub fn pardons(&self) -> Vec<&AuditEntry> {
        self.entries.iter().filter(|e| e.is_pardon()).collect()
    }

    /// Entries whose timestamp could not be used
    pub fn untimed_entries(&self) -> Vec<&AuditEntry> {
        self.entries.iter().filter(|e| e.issued_at.is_none()).collect()
    }

    /// Entries from the `window` before `now`, for the rollback view
    pub fn recent(&self, now: Timestamp, window: Duration) -> Vec<&AuditEntry> {
        let since = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.entries_since(since)
            .into_iter()
            .filter(|e| e.issued_at.is_some_and(|at| at <= now))
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    /// Export to JSON Lines
    pub fn to_jsonl(&self) -> String {
        self.entries
            .iter()
            .filter_map(|e| serde_json::to_string(e).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get statistics
    pub fn stats(&self) -> AuditStats {
        let mut by_issuer: BTreeMap<String, usize> = BTreeMap::new();
        let mut stats = AuditStats {
            total: self.entries.len(),
            ..AuditStats::default()
        };

        for entry in &self.entries {
            match entry.kind {
                ModificationKind::ManualPardon => stats.manual_pardons += 1,
                ModificationKind::AppealAccept => stats.appeals_accepted += 1,
                ModificationKind::ManualDurationChange { .. } => stats.duration_changes += 1,
                ModificationKind::SetAltBlockingTrue
                | ModificationKind::SetAltBlockingFalse
                | ModificationKind::SetWipingTrue
                | ModificationKind::SetWipingFalse => stats.flag_toggles += 1,
            }
            if entry.issued_at.is_none() {
                stats.untimed += 1;
            }
            let issuer = if entry.issuer.is_empty() { "unknown" } else { entry.issuer.as_str() };
            *by_issuer.entry(issuer.to_string()).or_default() += 1;
        }

        stats.pardon_rate = if stats.total > 0 {
            (stats.manual_pardons + stats.appeals_accepted) as f64 / stats.total as f64
        } else {
            0.0
        };
        stats.by_issuer = by_issuer;
        stats
    }
}

impl Default for ModerationAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about audit entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStats {
    pub total: usize,
    pub manual_pardons: usize,
    pub appeals_accepted: usize,
    pub duration_changes: usize,
    pub flag_toggles: usize,
    pub untimed: usize,
    pub pardon_rate: f64,
    pub by_issuer: BTreeMap<String, usize>,
}
