//! Moderation panel core: punishment records and operator settings
//!
//! Typed shapes for everything the status engine consumes. Records and
//! settings are produced once, at the fetch boundary, from the panel API's
//! JSON; nothing in this crate performs I/O.

pub mod data_model;
pub mod duration;
pub mod error;
pub mod settings;
pub mod timestamp;

pub use data_model::{ModificationEvent, ModificationKind, PunishmentRecord};
pub use duration::PunishmentDuration;
pub use error::{ModerationError, Result};
pub use settings::{
    CategoryThresholds, DurationSpec, DurationTable, DurationUnit, ModerationSettings,
    OffenseDurations, OffenseLevel, PunishmentCategory, PunishmentType, ScoringMode,
    SeverityPoints, SeverityTier, StatusThresholds,
};
pub use timestamp::Timestamp;
