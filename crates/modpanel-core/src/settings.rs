//! Operator settings: punishment types and status thresholds
//!
//! Loaded from the panel's settings document (JSON) or from a YAML file
//! kept alongside a deployment.

use crate::error::{ModerationError, Result};
use crate::duration::PunishmentDuration;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Category of a punishment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PunishmentCategory {
    /// Procedural actions (kicks, manual bans, blacklists); never scored
    #[serde(alias = "administrative", alias = "ADMINISTRATIVE")]
    Administrative,
    #[serde(alias = "social", alias = "SOCIAL")]
    Social,
    #[serde(alias = "gameplay", alias = "GAMEPLAY")]
    Gameplay,
}

impl fmt::Display for PunishmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PunishmentCategory::Administrative => write!(f, "Administrative"),
            PunishmentCategory::Social => write!(f, "Social"),
            PunishmentCategory::Gameplay => write!(f, "Gameplay"),
        }
    }
}

/// Severity tier selecting a point weight and duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Low,
    Regular,
    Severe,
}

impl SeverityTier {
    /// Parse a tier label, accepting the synonyms used across the panel.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" | "lenient" => Some(SeverityTier::Low),
            "regular" | "medium" => Some(SeverityTier::Regular),
            "severe" | "aggravated" | "high" => Some(SeverityTier::Severe),
            _ => None,
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeverityTier::Low => write!(f, "Low"),
            SeverityTier::Regular => write!(f, "Regular"),
            SeverityTier::Severe => write!(f, "Severe"),
        }
    }
}

/// How often a player has offended before; selects the duration column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffenseLevel {
    First,
    Medium,
    Habitual,
}

impl OffenseLevel {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "first" => Some(OffenseLevel::First),
            "medium" => Some(OffenseLevel::Medium),
            "habitual" => Some(OffenseLevel::Habitual),
            _ => None,
        }
    }
}

/// Severity-tiered point weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityPoints {
    #[serde(default)]
    pub low: u32,
    #[serde(default)]
    pub regular: u32,
    #[serde(default)]
    pub severe: u32,
}

impl SeverityPoints {
    pub fn for_tier(&self, tier: SeverityTier) -> u32 {
        match tier {
            SeverityTier::Low => self.low,
            SeverityTier::Regular => self.regular,
            SeverityTier::Severe => self.severe,
        }
    }
}

/// Unit of a configured duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

/// A configured duration such as `{ value: 7, unit: days }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSpec {
    pub value: i64,
    pub unit: DurationUnit,
}

impl DurationSpec {
    pub fn new(value: i64, unit: DurationUnit) -> Self {
        Self { value, unit }
    }

    /// Convert to a punishment duration. Months are thirty days; non-positive
    /// or overflowing values are permanent.
    pub fn to_duration(&self) -> PunishmentDuration {
        let unit_ms: i64 = match self.unit {
            DurationUnit::Minutes => 60_000,
            DurationUnit::Hours => 3_600_000,
            DurationUnit::Days => 86_400_000,
            DurationUnit::Weeks => 604_800_000,
            DurationUnit::Months => 30 * 86_400_000,
        };
        match self.value.checked_mul(unit_ms) {
            Some(ms) => PunishmentDuration::from_millis(ms),
            None => PunishmentDuration::Permanent,
        }
    }
}

/// Durations for each offense level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenseDurations {
    pub first: DurationSpec,
    pub medium: DurationSpec,
    pub habitual: DurationSpec,
}

impl OffenseDurations {
    pub fn for_level(&self, level: OffenseLevel) -> DurationSpec {
        match level {
            OffenseLevel::First => self.first,
            OffenseLevel::Medium => self.medium,
            OffenseLevel::Habitual => self.habitual,
        }
    }
}

/// Durations for each severity tier and offense level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationTable {
    pub low: OffenseDurations,
    pub regular: OffenseDurations,
    pub severe: OffenseDurations,
}

impl DurationTable {
    pub fn for_tier(&self, tier: SeverityTier) -> &OffenseDurations {
        match tier {
            SeverityTier::Low => &self.low,
            SeverityTier::Regular => &self.regular,
            SeverityTier::Severe => &self.severe,
        }
    }
}

/// How a punishment type is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Fixed points for permanent or cosmetic offenses
    Custom(u32),
    /// One flat weight regardless of severity
    SingleSeverity(u32),
    /// Weight picked by severity tier
    Tiered(SeverityPoints),
    /// Nothing configured
    Unscored,
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunishmentType {
    pub ordinal: u32,

    pub name: String,

    pub category: PunishmentCategory,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<SeverityPoints>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_severity_points: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_points: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durations: Option<DurationTable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_severity_durations: Option<OffenseDurations>,

    #[serde(default)]
    pub is_customizable: bool,

    #[serde(default)]
    pub can_be_altblocking: bool,

    #[serde(default)]
    pub can_be_statwiping: bool,
}

impl PunishmentType {
    /// Create an unscored entry.
    pub fn new(ordinal: u32, name: impl Into<String>, category: PunishmentCategory) -> Self {
        Self {
            ordinal,
            name: name.into(),
            category,
            points: None,
            single_severity_points: None,
            custom_points: None,
            durations: None,
            single_severity_durations: None,
            is_customizable: true,
            can_be_altblocking: false,
            can_be_statwiping: false,
        }
    }

    /// Built-in administrative entry.
    pub fn administrative(ordinal: u32, name: impl Into<String>) -> Self {
        let mut ty = Self::new(ordinal, name, PunishmentCategory::Administrative);
        ty.is_customizable = false;
        ty
    }

    pub fn with_points(mut self, low: u32, regular: u32, severe: u32) -> Self {
        self.points = Some(SeverityPoints { low, regular, severe });
        self
    }

    pub fn with_single_severity_points(mut self, points: u32) -> Self {
        self.single_severity_points = Some(points);
        self
    }

    pub fn with_custom_points(mut self, points: u32) -> Self {
        self.custom_points = Some(points);
        self
    }

    pub fn with_durations(mut self, durations: DurationTable) -> Self {
        self.durations = Some(durations);
        self
    }

    pub fn with_single_severity_durations(mut self, durations: OffenseDurations) -> Self {
        self.single_severity_durations = Some(durations);
        self
    }

    pub fn is_administrative(&self) -> bool {
        self.category == PunishmentCategory::Administrative
    }

    /// Scoring mode by precedence: custom, then single-severity, then tiered.
    pub fn scoring(&self) -> ScoringMode {
        if let Some(points) = self.custom_points {
            ScoringMode::Custom(points)
        } else if let Some(points) = self.single_severity_points {
            ScoringMode::SingleSeverity(points)
        } else if let Some(points) = self.points {
            ScoringMode::Tiered(points)
        } else {
            ScoringMode::Unscored
        }
    }

    /// Points a punishment of this type is worth at the given severity label.
    ///
    /// Tiered types need a recognizable severity; anything else yields 0.
    pub fn points_for(&self, severity: Option<&str>) -> u32 {
        match self.scoring() {
            ScoringMode::Custom(points) | ScoringMode::SingleSeverity(points) => points,
            ScoringMode::Tiered(points) => severity
                .and_then(SeverityTier::parse)
                .map(|tier| points.for_tier(tier))
                .unwrap_or(0),
            ScoringMode::Unscored => 0,
        }
    }

    /// Configured duration for a new punishment of this type.
    ///
    /// Single-severity durations win when configured; otherwise a severity
    /// tier is required to pick a row of the table.
    pub fn duration_for(&self, tier: Option<SeverityTier>, level: OffenseLevel) -> Option<DurationSpec> {
        if let Some(single) = &self.single_severity_durations {
            return Some(single.for_level(level));
        }
        let table = self.durations.as_ref()?;
        Some(table.for_tier(tier?).for_level(level))
    }
}

/// Medium/habitual cut-offs for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryThresholds {
    pub medium: u32,
    pub habitual: u32,
}

impl CategoryThresholds {
    pub fn new(medium: u32, habitual: u32) -> Self {
        Self { medium, habitual }
    }
}

/// Operator-configured status thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub social: CategoryThresholds,
    pub gameplay: CategoryThresholds,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            social: CategoryThresholds::new(4, 8),
            gameplay: CategoryThresholds::new(5, 10),
        }
    }
}

impl StatusThresholds {
    /// Thresholds for a scored category; administrative has none.
    pub fn for_category(&self, category: PunishmentCategory) -> Option<CategoryThresholds> {
        match category {
            PunishmentCategory::Social => Some(self.social),
            PunishmentCategory::Gameplay => Some(self.gameplay),
            PunishmentCategory::Administrative => None,
        }
    }

    /// Categories whose habitual cut-off sits below the medium one.
    pub fn inverted_categories(&self) -> Vec<PunishmentCategory> {
        let mut inverted = Vec::new();
        if self.social.habitual < self.social.medium {
            inverted.push(PunishmentCategory::Social);
        }
        if self.gameplay.habitual < self.gameplay.medium {
            inverted.push(PunishmentCategory::Gameplay);
        }
        inverted
    }
}

/// The settings document consumed by the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationSettings {
    /// Operator-configured punishment types
    #[serde(default)]
    pub punishment_types: Vec<PunishmentType>,

    /// Missing means engine defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_thresholds: Option<StatusThresholds>,
}

impl ModerationSettings {
    pub fn new(punishment_types: Vec<PunishmentType>) -> Self {
        Self {
            punishment_types,
            status_thresholds: None,
        }
    }

    pub fn with_thresholds(mut self, thresholds: StatusThresholds) -> Self {
        self.status_thresholds = Some(thresholds);
        self
    }

    /// Load settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Effective thresholds, falling back to engine defaults.
    pub fn thresholds(&self) -> StatusThresholds {
        match self.status_thresholds {
            Some(thresholds) => thresholds,
            None => {
                tracing::debug!("no status thresholds configured, using defaults");
                StatusThresholds::default()
            }
        }
    }

    /// Reject documents where two configured types share an ordinal.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for ty in &self.punishment_types {
            if !seen.insert(ty.ordinal) {
                return Err(ModerationError::InvalidSettings(format!(
                    "duplicate punishment type ordinal {} ({})",
                    ty.ordinal, ty.name
                )));
            }
        }

        if let Some(thresholds) = &self.status_thresholds {
            for category in thresholds.inverted_categories() {
                tracing::warn!(
                    %category,
                    "habitual threshold is below medium; habitual classification takes precedence"
                );
            }
        }
        Ok(())
    }

    /// Configured types grouped by category, each group ordered by ordinal.
    pub fn types_by_category(&self) -> BTreeMap<PunishmentCategory, Vec<&PunishmentType>> {
        let mut grouped: BTreeMap<PunishmentCategory, Vec<&PunishmentType>> = BTreeMap::new();
        for ty in &self.punishment_types {
            grouped.entry(ty.category).or_default().push(ty);
        }
        for group in grouped.values_mut() {
            group.sort_by_key(|ty| ty.ordinal);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_synonyms() {
        assert_eq!(SeverityTier::parse("Lenient"), Some(SeverityTier::Low));
        assert_eq!(SeverityTier::parse(" LOW "), Some(SeverityTier::Low));
        assert_eq!(SeverityTier::parse("Regular"), Some(SeverityTier::Regular));
        assert_eq!(SeverityTier::parse("medium"), Some(SeverityTier::Regular));
        assert_eq!(SeverityTier::parse("Aggravated"), Some(SeverityTier::Severe));
        assert_eq!(SeverityTier::parse("HIGH"), Some(SeverityTier::Severe));
        assert_eq!(SeverityTier::parse("extreme"), None);
    }

    #[test]
    fn test_scoring_precedence() {
        let ty = PunishmentType::new(10, "Cheating", PunishmentCategory::Gameplay)
            .with_points(1, 2, 3)
            .with_single_severity_points(4)
            .with_custom_points(6);
        assert_eq!(ty.scoring(), ScoringMode::Custom(6));
        assert_eq!(ty.points_for(Some("severe")), 6);

        let ty = PunishmentType::new(11, "Spam", PunishmentCategory::Social)
            .with_points(1, 2, 3)
            .with_single_severity_points(4);
        assert_eq!(ty.points_for(None), 4);

        let ty = PunishmentType::new(12, "Chat Abuse", PunishmentCategory::Social).with_points(1, 3, 5);
        assert_eq!(ty.points_for(Some("Regular")), 3);
        assert_eq!(ty.points_for(Some("aggravated")), 5);
        assert_eq!(ty.points_for(Some("unknown")), 0);
        assert_eq!(ty.points_for(None), 0);

        let ty = PunishmentType::new(13, "Other", PunishmentCategory::Social);
        assert_eq!(ty.scoring(), ScoringMode::Unscored);
        assert_eq!(ty.points_for(Some("low")), 0);
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = StatusThresholds::default();
        assert_eq!(thresholds.social, CategoryThresholds::new(4, 8));
        assert_eq!(thresholds.gameplay, CategoryThresholds::new(5, 10));
        assert_eq!(thresholds.for_category(PunishmentCategory::Administrative), None);
    }

    #[test]
    fn test_settings_from_json() {
        let json = r#"{
            "punishmentTypes": [
                {"ordinal": 8, "name": "Chat Abuse", "category": "Social",
                 "points": {"low": 1, "regular": 3, "severe": 5}},
                {"ordinal": 9, "name": "Cheating", "category": "gameplay", "customPoints": 6}
            ]
        }"#;
        let settings = ModerationSettings::from_json(json).unwrap();
        assert_eq!(settings.punishment_types.len(), 2);
        assert_eq!(settings.punishment_types[1].category, PunishmentCategory::Gameplay);
        assert_eq!(settings.thresholds(), StatusThresholds::default());
    }

    #[test]
    fn test_settings_from_yaml() {
        let yaml = r#"
punishmentTypes:
  - ordinal: 8
    name: Chat Abuse
    category: Social
    singleSeverityPoints: 2
    singleSeverityDurations:
      first: { value: 1, unit: hours }
      medium: { value: 1, unit: days }
      habitual: { value: 2, unit: weeks }
statusThresholds:
  social: { medium: 3, habitual: 6 }
  gameplay: { medium: 5, habitual: 10 }
"#;
        let settings = ModerationSettings::from_yaml(yaml).unwrap();
        assert_eq!(settings.thresholds().social, CategoryThresholds::new(3, 6));
        let ty = &settings.punishment_types[0];
        assert_eq!(
            ty.duration_for(None, OffenseLevel::Habitual).map(|d| d.to_duration()),
            Some(PunishmentDuration::from(chrono::Duration::weeks(2)))
        );
    }

    #[test]
    fn test_duplicate_ordinals_rejected() {
        let json = r#"{"punishmentTypes": [
            {"ordinal": 8, "name": "A", "category": "Social"},
            {"ordinal": 8, "name": "B", "category": "Gameplay"}
        ]}"#;
        let err = ModerationSettings::from_json(json).unwrap_err();
        assert!(err.to_string().starts_with("SETTINGS/"));
    }

    #[test]
    fn test_malformed_settings() {
        assert!(matches!(
            ModerationSettings::from_json("{\"punishmentTypes\": 5}"),
            Err(ModerationError::Json(_))
        ));
        assert!(matches!(
            ModerationSettings::from_yaml("punishmentTypes: [: ]"),
            Err(ModerationError::Yaml(_))
        ));
    }

    #[test]
    fn test_duration_table_lookup() {
        let row = |a, b, c| OffenseDurations {
            first: DurationSpec::new(a, DurationUnit::Days),
            medium: DurationSpec::new(b, DurationUnit::Days),
            habitual: DurationSpec::new(c, DurationUnit::Days),
        };
        let ty = PunishmentType::new(8, "Chat Abuse", PunishmentCategory::Social).with_durations(DurationTable {
            low: row(1, 2, 3),
            regular: row(4, 5, 6),
            severe: row(7, 8, 9),
        });
        assert_eq!(
            ty.duration_for(Some(SeverityTier::Regular), OffenseLevel::Medium),
            Some(DurationSpec::new(5, DurationUnit::Days))
        );
        assert_eq!(ty.duration_for(None, OffenseLevel::Medium), None);
        assert_eq!(
            DurationSpec::new(2, DurationUnit::Months).to_duration(),
            PunishmentDuration::from(chrono::Duration::days(60))
        );
    }

    #[test]
    fn test_configured_duration_bounds() {
        assert_eq!(
            DurationSpec::new(90, DurationUnit::Minutes).to_duration(),
            PunishmentDuration::Fixed(5_400_000)
        );
        assert!(DurationSpec::new(0, DurationUnit::Days).to_duration().is_permanent());
        assert!(DurationSpec::new(-3, DurationUnit::Weeks).to_duration().is_permanent());
        assert!(DurationSpec::new(i64::MAX, DurationUnit::Months).to_duration().is_permanent());
        assert!(DurationSpec::new(i64::MAX / 100, DurationUnit::Days).to_duration().is_permanent());
        assert!(DurationSpec::new(i64::MIN, DurationUnit::Hours).to_duration().is_permanent());
        assert_eq!(
            DurationSpec::new(i64::MAX / 60_000, DurationUnit::Minutes).to_duration(),
            PunishmentDuration::Fixed(i64::MAX / 60_000 * 60_000)
        );
    }

    #[test]
    fn test_inverted_thresholds_detected() {
        let thresholds = StatusThresholds {
            social: CategoryThresholds::new(8, 4),
            gameplay: CategoryThresholds::new(5, 10),
        };
        assert_eq!(thresholds.inverted_categories(), vec![PunishmentCategory::Social]);
    }

    #[test]
    fn test_types_by_category() {
        let settings = ModerationSettings::new(vec![
            PunishmentType::new(12, "B", PunishmentCategory::Social),
            PunishmentType::new(9, "A", PunishmentCategory::Social),
            PunishmentType::new(10, "C", PunishmentCategory::Gameplay),
        ]);
        let grouped = settings.types_by_category();
        let social: Vec<u32> = grouped[&PunishmentCategory::Social].iter().map(|t| t.ordinal).collect();
        assert_eq!(social, vec![9, 12]);
        assert_eq!(grouped[&PunishmentCategory::Gameplay].len(), 1);
    }
}
