//! Category status scoring
//!
//! Sums the points of a player's active, scored punishments per category and
//! classifies each total against the operator's thresholds.

use crate::activity::is_active;
use crate::catalog::PunishmentCatalog;
use crate::replay::replay;
use modpanel_core::{
    CategoryThresholds, ModerationSettings, OffenseLevel, PunishmentCategory, PunishmentRecord,
    StatusThresholds, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Moderation risk level of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum StatusLevel {
    #[default]
    Low = 0,
    Medium = 1,
    Habitual = 2,
}

impl StatusLevel {
    /// Classify a point total. Habitual is checked first and that order is
    /// the rule, even when `habitual < medium`.
    pub fn from_points(points: u32, thresholds: CategoryThresholds) -> Self {
        if points >= thresholds.habitual {
            StatusLevel::Habitual
        } else if points >= thresholds.medium {
            StatusLevel::Medium
        } else {
            StatusLevel::Low
        }
    }

    /// Offense level a new punishment should be issued at
    pub fn offense_level(&self) -> OffenseLevel {
        match self {
            StatusLevel::Low => OffenseLevel::First,
            StatusLevel::Medium => OffenseLevel::Medium,
            StatusLevel::Habitual => OffenseLevel::Habitual,
        }
    }

    /// Label for the player's risk badge
    pub fn badge_label(&self) -> &'static str {
        match self {
            StatusLevel::Low => "Low Risk",
            StatusLevel::Medium => "Medium Risk",
            StatusLevel::Habitual => "Habitual Offender",
        }
    }
}

impl std::fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StatusLevel::Low => write!(f, "Low"),
            StatusLevel::Medium => write!(f, "Medium"),
            StatusLevel::Habitual => write!(f, "Habitual"),
        }
    }
}

/// Points one active punishment contributed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointContribution {
    pub punishment_id: String,
    pub type_ordinal: u32,
    pub category: PunishmentCategory,
    pub points: u32,
}

/// A player's moderation status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatus {
    pub social: StatusLevel,
    pub gameplay: StatusLevel,
    pub social_points: u32,
    pub gameplay_points: u32,
    /// Scored punishments behind the totals
    pub contributions: Vec<PointContribution>,
    /// Any started punishment, administrative included, is in force
    pub currently_punished: bool,
}

impl PlayerStatus {
    /// Status of a player with nothing on record
    pub fn clean() -> Self {
        Self {
            social: StatusLevel::Low,
            gameplay: StatusLevel::Low,
            social_points: 0,
            gameplay_points: 0,
            contributions: Vec::new(),
            currently_punished: false,
        }
    }

    pub fn level(&self, category: PunishmentCategory) -> Option<StatusLevel> {
        match category {
            PunishmentCategory::Social => Some(self.social),
            PunishmentCategory::Gameplay => Some(self.gameplay),
            PunishmentCategory::Administrative => None,
        }
    }

    pub fn points(&self, category: PunishmentCategory) -> u32 {
        match category {
            PunishmentCategory::Social => self.social_points,
            PunishmentCategory::Gameplay => self.gameplay_points,
            PunishmentCategory::Administrative => 0,
        }
    }

    /// The higher of the two category levels
    pub fn overall(&self) -> StatusLevel {
        self.social.max(self.gameplay)
    }
}

/// Scores players against a catalog and thresholds
#[derive(Debug, Clone)]
pub struct StatusCalculator {
    pub catalog: PunishmentCatalog,
    pub thresholds: StatusThresholds,
}

impl Default for StatusCalculator {
    fn default() -> Self {
        Self::new(PunishmentCatalog::builtin(), StatusThresholds::default())
    }
}

impl StatusCalculator {
    pub fn new(catalog: PunishmentCatalog, thresholds: StatusThresholds) -> Self {
        Self { catalog, thresholds }
    }

    pub fn from_settings(settings: &ModerationSettings) -> Self {
        Self::new(PunishmentCatalog::from_settings(settings), settings.thresholds())
    }

    /// Points a single record is worth, `None` if it is unresolvable or administrative.
    pub fn points_for(&self, record: &PunishmentRecord) -> Option<(PunishmentCategory, u32)> {
        let Some(ty) = self.catalog.get(record.type_ordinal) else {
            tracing::debug!(
                punishment = %record.id,
                ordinal = record.type_ordinal,
                "unknown punishment type, contributes no points"
            );
            return None;
        };
        if ty.is_administrative() {
            return None;
        }
        Some((ty.category, ty.points_for(record.severity.as_deref())))
    }

    /// Compute a player's status at `now`.
    pub fn calculate(&self, punishments: &[PunishmentRecord], now: Timestamp) -> PlayerStatus {
        let mut status = PlayerStatus::clean();

        for record in punishments {
            let state = replay(record);
            if !is_active(record, &state, now) {
                continue;
            }
            if record.is_started() {
                status.currently_punished = true;
            }

            let Some((category, points)) = self.points_for(record) else {
                continue;
            };
            let total = match category {
                PunishmentCategory::Social => &mut status.social_points,
                PunishmentCategory::Gameplay => &mut status.gameplay_points,
                PunishmentCategory::Administrative => continue,
            };
            *total = total.saturating_add(points);
            status.contributions.push(PointContribution {
                punishment_id: record.id.clone(),
                type_ordinal: record.type_ordinal,
                category,
                points,
            });
        }

        status.social = StatusLevel::from_points(status.social_points, self.thresholds.social);
        status.gameplay = StatusLevel::from_points(status.gameplay_points, self.thresholds.gameplay);

        tracing::trace!(
            social = %status.social,
            social_points = status.social_points,
            gameplay = %status.gameplay,
            gameplay_points = status.gameplay_points,
            "player status calculated"
        );
        status
    }
}

/// Convenience function to calculate a player's status from raw settings
pub fn calculate_status(
    punishments: &[PunishmentRecord],
    settings: &ModerationSettings,
    now: Timestamp,
) -> PlayerStatus {
    StatusCalculator::from_settings(settings).calculate(punishments, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use modpanel_core::{ModificationEvent, PunishmentType};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn settings() -> ModerationSettings {
        ModerationSettings::new(vec![
            PunishmentType::new(8, "Chat Abuse", PunishmentCategory::Social).with_points(1, 3, 5),
            PunishmentType::new(9, "Cheating", PunishmentCategory::Gameplay).with_custom_points(6),
            PunishmentType::new(10, "Team Griefing", PunishmentCategory::Gameplay).with_single_severity_points(2),
        ])
    }

    fn active(id: &str, ordinal: u32) -> PunishmentRecord {
        PunishmentRecord::new(id, ordinal, t0()).started(t0())
    }

    #[test]
    fn test_level_from_points() {
        let gameplay = CategoryThresholds::new(5, 10);
        assert_eq!(StatusLevel::from_points(4, gameplay), StatusLevel::Low);
        assert_eq!(StatusLevel::from_points(5, gameplay), StatusLevel::Medium);
        assert_eq!(StatusLevel::from_points(9, gameplay), StatusLevel::Medium);
        assert_eq!(StatusLevel::from_points(10, gameplay), StatusLevel::Habitual);
    }

    #[test]
    fn test_inverted_thresholds_check_habitual_first() {
        let inverted = CategoryThresholds::new(8, 4);
        assert_eq!(StatusLevel::from_points(3, inverted), StatusLevel::Low);
        assert_eq!(StatusLevel::from_points(4, inverted), StatusLevel::Habitual);
        assert_eq!(StatusLevel::from_points(8, inverted), StatusLevel::Habitual);
    }

    #[test]
    fn test_zero_thresholds() {
        assert_eq!(StatusLevel::from_points(0, CategoryThresholds::new(0, 0)), StatusLevel::Habitual);
        assert_eq!(StatusLevel::from_points(0, CategoryThresholds::new(0, 1)), StatusLevel::Medium);
    }

    #[test]
    fn test_mixed_scenario() {
        let punishments = vec![
            active("social", 8).with_severity("Regular"),
            active("gameplay", 9),
        ];
        let status = calculate_status(&punishments, &settings(), t0() + Duration::hours(1));
        assert_eq!(status.social_points, 3);
        assert_eq!(status.social, StatusLevel::Low);
        assert_eq!(status.gameplay_points, 6);
        assert_eq!(status.gameplay, StatusLevel::Medium);
        assert_eq!(status.contributions.len(), 2);
        assert!(status.currently_punished);
        assert_eq!(status.overall(), StatusLevel::Medium);
    }

    #[test]
    fn test_administrative_excluded() {
        let punishments = vec![active("ban", 2)];
        let status = calculate_status(&punishments, &settings(), t0());
        assert_eq!(status.social_points, 0);
        assert_eq!(status.gameplay_points, 0);
        assert!(status.contributions.is_empty());
        assert!(status.currently_punished);
    }

    #[test]
    fn test_inactive_and_unknown_skipped() {
        let punishments = vec![
            active("pardoned", 9).modified(ModificationEvent::pardon(t0() + Duration::minutes(1))),
            active("expired", 10)
                .with_duration(Duration::days(1).into())
                .started(t0()),
            active("unknown", 99),
        ];
        let status = calculate_status(&punishments, &settings(), t0() + Duration::days(2));
        assert_eq!(status.gameplay_points, 0);
        assert!(status.contributions.is_empty());
        // The unknown type is still an active, started punishment
        assert!(status.currently_punished);
    }

    #[test]
    fn test_unrecognized_severity_scores_zero() {
        let punishments = vec![active("a", 8).with_severity("catastrophic"), active("b", 8)];
        let status = calculate_status(&punishments, &settings(), t0());
        assert_eq!(status.social_points, 0);
        assert_eq!(status.contributions.len(), 2);
    }

    #[test]
    fn test_unstarted_punishment_still_scores() {
        let punishments = vec![PunishmentRecord::new("queued", 10, t0())];
        let status = calculate_status(&punishments, &settings(), t0());
        assert_eq!(status.gameplay_points, 2);
        assert!(!status.currently_punished);
    }

    #[test]
    fn test_habitual_accumulation() {
        let punishments = vec![active("a", 9), active("b", 9)];
        let status = calculate_status(&punishments, &settings(), t0());
        assert_eq!(status.gameplay_points, 12);
        assert_eq!(status.gameplay, StatusLevel::Habitual);
        assert_eq!(status.gameplay.offense_level(), OffenseLevel::Habitual);
    }

    #[test]
    fn test_custom_thresholds() {
        let settings = settings().with_thresholds(StatusThresholds {
            social: CategoryThresholds::new(2, 3),
            gameplay: CategoryThresholds::new(5, 10),
        });
        let punishments = vec![active("a", 8).with_severity("high")];
        let status = calculate_status(&punishments, &settings, t0());
        assert_eq!(status.social_points, 5);
        assert_eq!(status.social, StatusLevel::Habitual);
    }

    #[test]
    fn test_point_totals_saturate() {
        let settings = ModerationSettings::new(vec![
            PunishmentType::new(30, "Chargeback Fraud", PunishmentCategory::Gameplay).with_custom_points(u32::MAX),
        ]);
        let punishments = vec![active("a", 30), active("b", 30), active("c", 10)];
        let status = calculate_status(&punishments, &settings, t0());
        assert_eq!(status.gameplay_points, u32::MAX);
        assert_eq!(status.gameplay, StatusLevel::Habitual);
        assert_eq!(status.contributions.len(), 2);
    }

    #[test]
    fn test_empty_record() {
        let status = StatusCalculator::default().calculate(&[], t0());
        assert_eq!(status, PlayerStatus::clean());
    }
}
