//! Punishment type catalog
//!
//! Six administrative types are built in and can never be overridden.
//! Everything else comes from operator settings.

use modpanel_core::{ModerationSettings, PunishmentCategory, PunishmentType};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Built-in administrative types, ordinals 0-5.
pub static BUILTIN_TYPES: Lazy<Vec<PunishmentType>> = Lazy::new(|| {
    vec![
        PunishmentType::administrative(0, "Kick"),
        PunishmentType::administrative(1, "Manual Mute"),
        PunishmentType::administrative(2, "Manual Ban"),
        PunishmentType::administrative(3, "Security Ban"),
        PunishmentType::administrative(4, "Linked Ban"),
        PunishmentType::administrative(5, "Blacklist"),
    ]
});

/// Resolved catalog keyed by ordinal
#[derive(Debug, Clone)]
pub struct PunishmentCatalog {
    types: BTreeMap<u32, PunishmentType>,
}

impl Default for PunishmentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PunishmentCatalog {
    /// Catalog holding only the built-in administrative types
    pub fn builtin() -> Self {
        let types = BUILTIN_TYPES
            .iter()
            .map(|ty| (ty.ordinal, ty.clone()))
            .collect();
        Self { types }
    }

    /// Merge operator-configured types over the built-ins.
    ///
    /// Configured administrative entries named like a built-in are dropped,
    /// as is any entry whose ordinal a built-in already owns.
    pub fn from_types(configured: &[PunishmentType]) -> Self {
        let mut catalog = Self::builtin();

        for ty in configured {
            if ty.is_administrative() && is_builtin_name(&ty.name) {
                tracing::debug!(
                    ordinal = ty.ordinal,
                    name = %ty.name,
                    "discarding configured administrative type shadowing a built-in"
                );
                continue;
            }
            if is_builtin_ordinal(ty.ordinal) {
                tracing::debug!(
                    ordinal = ty.ordinal,
                    name = %ty.name,
                    "discarding configured type using a built-in ordinal"
                );
                continue;
            }
            catalog.types.insert(ty.ordinal, ty.clone());
        }

        catalog
    }

    pub fn from_settings(settings: &ModerationSettings) -> Self {
        Self::from_types(&settings.punishment_types)
    }

    /// Look up a type by ordinal
    pub fn get(&self, ordinal: u32) -> Option<&PunishmentType> {
        self.types.get(&ordinal)
    }

    /// Display name, with a placeholder for unknown ordinals
    pub fn display_name(&self, ordinal: u32) -> String {
        match self.get(ordinal) {
            Some(ty) => ty.name.clone(),
            None => format!("Unknown Punishment {}", ordinal),
        }
    }

    /// Types of one category, ordered by ordinal
    pub fn by_category(&self, category: PunishmentCategory) -> Vec<&PunishmentType> {
        self.types.values().filter(|ty| ty.category == category).collect()
    }

    /// All types, ordered by ordinal
    pub fn iter(&self) -> impl Iterator<Item = &PunishmentType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn is_builtin_ordinal(ordinal: u32) -> bool {
    BUILTIN_TYPES.iter().any(|ty| ty.ordinal == ordinal)
}

fn is_builtin_name(name: &str) -> bool {
    let name = name.trim();
    BUILTIN_TYPES.iter().any(|ty| ty.name.eq_ignore_ascii_case(name))
}
