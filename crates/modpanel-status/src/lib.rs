//! Punishment lifecycle and moderation status engine
//!
//! Derives, from immutable punishment records and their append-only
//! modification logs, whether each punishment is in force right now and how
//! risky a player is per category.
//!
//! # Architecture
//!
//! ```text
//! PunishmentRecord → Replay → EffectiveState → Classifier → active?
//!                                                  ↓
//!        Catalog + StatusThresholds ─────────→ Scorer → PlayerStatus
//!                                                  ↓
//!                                    Presentation (badges, durations)
//! ```
//!
//! Every function is pure: callers pass the records, the settings and `now`.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use modpanel_core::{ModerationSettings, PunishmentCategory, PunishmentRecord, PunishmentType};
//! use modpanel_status::{calculate_status, StatusLevel};
//!
//! let settings = ModerationSettings::new(vec![
//!     PunishmentType::new(9, "Cheating", PunishmentCategory::Gameplay).with_custom_points(6),
//! ]);
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
//! let punishments = vec![PunishmentRecord::new("P-1", 9, t0).started(t0)];
//!
//! let status = calculate_status(&punishments, &settings, t0 + Duration::hours(1));
//! assert_eq!(status.gameplay, StatusLevel::Medium);
//! assert_eq!(status.gameplay_points, 6);
//! ```
//!
//! # Replay
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use modpanel_core::{ModificationEvent, PunishmentRecord};
//! use modpanel_status::{is_active, replay};
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
//! let record = PunishmentRecord::new("P-2", 8, t0)
//!     .with_duration(Duration::days(30).into())
//!     .started(t0)
//!     .modified(ModificationEvent::duration_change(Duration::days(7).into(), t0 + Duration::days(3)));
//!
//! let state = replay(&record);
//! assert_eq!(state.expires_at, Some(t0 + Duration::days(7)));
//! assert!(!is_active(&record, &state, t0 + Duration::days(8)));
//! ```

pub mod activity;
pub mod audit;
pub mod catalog;
pub mod fingerprint;
pub mod presentation;
pub mod replay;
pub mod status;

pub use activity::{is_active, is_active_now};
pub use audit::{AuditEntry, AuditStats, ModerationAuditLog};
pub use catalog::{PunishmentCatalog, BUILTIN_TYPES};
pub use fingerprint::StatusCacheKey;
pub use presentation::{
    badge, expiry_text, format_duration, format_span, suggested_duration, summarize,
    PunishmentBadge, PunishmentSummary,
};
pub use replay::{chronological, replay, EffectiveState};
pub use status::{calculate_status, PlayerStatus, PointContribution, StatusCalculator, StatusLevel};

use modpanel_core::{ModerationSettings, PunishmentRecord, Timestamp};

/// Everything the player-detail view needs in one pass
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOverview {
    pub status: PlayerStatus,
    pub punishments: Vec<PunishmentSummary>,
}

/// Build the player overview from a fetched record and the settings document.
pub fn player_overview(
    punishments: &[PunishmentRecord],
    settings: &ModerationSettings,
    now: Timestamp,
) -> PlayerOverview {
    let calculator = StatusCalculator::from_settings(settings);
    PlayerOverview {
        status: calculator.calculate(punishments, now),
        punishments: summarize(punishments, &calculator.catalog, now),
    }
}

/// Quick check for the "Currently Punished" badge
pub fn is_currently_punished(punishments: &[PunishmentRecord], now: Timestamp) -> bool {
    punishments
        .iter()
        .any(|record| record.is_started() && is_active_now(record, now))
}
