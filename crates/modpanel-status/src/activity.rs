//! Activity classification
//!
//! Answers "is this punishment in force right now". Whether it has started
//! at all is a presentation concern and is checked before calling in here.

use crate::replay::{replay, EffectiveState};
use modpanel_core::{PunishmentRecord, Timestamp};

/// Decide whether a punishment is currently in force.
///
/// Precedence: any pardon, then the replayed expiry (only when the record
/// has modifications), then the original expiry, then the replayed flag.
/// A replayed expiry of `None` always falls through to the original expiry,
/// including after a change to a permanent duration.
pub fn is_active(record: &PunishmentRecord, state: &EffectiveState, now: Timestamp) -> bool {
    if record.is_pardoned() {
        return false;
    }

    if state.has_modifications {
        if let Some(expires_at) = state.expires_at {
            return expires_at > now;
        }
    }

    if let Some(expires_at) = record.expires_at {
        return expires_at > now;
    }

    state.active
}

/// Replay and classify in one step.
pub fn is_active_now(record: &PunishmentRecord, now: Timestamp) -> bool {
    is_active(record, &replay(record), now)
}
