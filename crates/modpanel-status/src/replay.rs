//! Modification replay
//!
//! Folds a punishment's modification log, in `issued_at` order, into the
//! state the punishment is actually in. Insertion order is never trusted:
//! a pardon fetched late still wins over a duration change issued before it.

use modpanel_core::{ModificationEvent, ModificationKind, PunishmentDuration, PunishmentRecord, Timestamp};
use serde::{Deserialize, Serialize};

/// A punishment's state after replaying its modifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveState {
    pub active: bool,
    pub expires_at: Option<Timestamp>,
    pub duration: PunishmentDuration,
    pub has_modifications: bool,
    /// Whether a replayed duration change or pardon rewrote `expires_at`
    pub expiry_modified: bool,
    /// When the replayed pardon or accepted appeal was issued
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pardoned_at: Option<Timestamp>,
    /// Latest alt-blocking toggle, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_blocking: Option<bool>,
    /// Latest stat-wiping toggle, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiping: Option<bool>,
}

impl EffectiveState {
    /// The state as issued, before any modification is applied.
    pub fn initial(record: &PunishmentRecord) -> Self {
        Self {
            active: record.active,
            expires_at: record.expires_at,
            duration: record.duration,
            has_modifications: !record.modifications.is_empty(),
            expiry_modified: false,
            pardoned_at: None,
            alt_blocking: None,
            wiping: None,
        }
    }

    pub fn is_pardoned(&self) -> bool {
        self.pardoned_at.is_some()
    }

    /// Apply a single event. Once pardoned, only the flag toggles still move.
    fn apply(mut self, record: &PunishmentRecord, event: &ModificationEvent, at: Timestamp) -> Self {
        match event.kind {
            ModificationKind::ManualPardon | ModificationKind::AppealAccept => {
                if !self.is_pardoned() {
                    self.active = false;
                    self.expires_at = Some(at);
                    self.expiry_modified = true;
                    self.pardoned_at = Some(at);
                }
            }
            ModificationKind::ManualDurationChange { effective_duration } => {
                if !self.is_pardoned() {
                    self.duration = effective_duration;
                    self.expires_at = record
                        .anchor()
                        .and_then(|start| effective_duration.expiry_from(start));
                    self.expiry_modified = true;
                }
            }
            ModificationKind::SetAltBlockingTrue => self.alt_blocking = Some(true),
            ModificationKind::SetAltBlockingFalse => self.alt_blocking = Some(false),
            ModificationKind::SetWipingTrue => self.wiping = Some(true),
            ModificationKind::SetWipingFalse => self.wiping = Some(false),
        }
        self
    }
}

/// Modifications with a usable timestamp, oldest first.
///
/// The sort is stable, so events sharing a timestamp keep insertion order.
pub fn chronological(record: &PunishmentRecord) -> Vec<(Timestamp, &ModificationEvent)> {
    let mut timed: Vec<(Timestamp, &ModificationEvent)> = record
        .modifications
        .iter()
        .filter_map(|event| match event.issued_at {
            Some(at) => Some((at, event)),
            None => {
                tracing::debug!(
                    punishment = %record.id,
                    kind = %event.kind,
                    "modification has no usable timestamp, excluded from replay"
                );
                None
            }
        })
        .collect();
    timed.sort_by_key(|(at, _)| *at);
    timed
}

/// Replay a punishment's modification log into its effective state.
pub fn replay(record: &PunishmentRecord) -> EffectiveState {
    chronological(record)
        .into_iter()
        .fold(EffectiveState::initial(record), |state, (at, event)| {
            state.apply(record, event, at)
        })
}
