//! Content fingerprints for hosts that cache player status
//!
//! The engine keeps no cache of its own. A host that does must key on the
//! content of `(punishments, catalog, thresholds)`, never on object identity,
//! since records arrive as fresh snapshots on every fetch.

use crate::catalog::PunishmentCatalog;
use modpanel_core::{PunishmentRecord, StatusThresholds};
use serde::Serialize;

/// Hash of everything a status calculation depends on, except `now`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusCacheKey(String);

impl StatusCacheKey {
    pub fn compute(
        punishments: &[PunishmentRecord],
        catalog: &PunishmentCatalog,
        thresholds: &StatusThresholds,
    ) -> Self {
        let mut hasher = blake3::Hasher::new();
        feed(&mut hasher, b"punishments", punishments);
        feed(&mut hasher, b"catalog", &catalog.iter().collect::<Vec<_>>());
        feed(&mut hasher, b"thresholds", thresholds);
        Self(format!("blake3:{}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StatusCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn feed<T: Serialize + ?Sized>(hasher: &mut blake3::Hasher, label: &[u8], value: &T) {
    // Plain data, serialization does not fail.
    let body = serde_json::to_vec(value).unwrap_or_default();
    hasher.update(label);
    hasher.update(&(body.len() as u64).to_le_bytes());
    hasher.update(&body);
}
