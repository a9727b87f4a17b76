#![allow(dead_code)]
//! Shared integration test utilities.
//!
//! Import with:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

use chrono::{TimeZone, Utc};
use modpanel_core::{ModerationSettings, PunishmentRecord, Timestamp};
use std::path::PathBuf;
use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Route engine logs to the test writer, once per binary.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .with_target(true)
            .with_ansi(false)
            .try_init();
    });
}

/// Absolute path of a file under `testing/fixtures/moderation`
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    // crates/modpanel-status sits two levels below the workspace root
    let workspace_root = std::path::Path::new(&manifest_dir)
        .parent()
        .and_then(|crates| crates.parent())
        .expect("workspace root");
    workspace_root.join("testing/fixtures/moderation").join(name)
}

pub fn load_settings() -> ModerationSettings {
    let path = fixture_path("settings.yaml");
    let yaml = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e));
    ModerationSettings::from_yaml(&yaml).expect("fixture settings are valid")
}

pub fn load_punishments() -> Vec<PunishmentRecord> {
    let path = fixture_path("punishments.json");
    let json = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e));
    PunishmentRecord::list_from_json(&json).expect("fixture punishments are valid")
}

/// 2024-05-01 12:00 UTC, the issue time used across the fixtures
pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}
