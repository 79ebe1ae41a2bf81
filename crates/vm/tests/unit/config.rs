//! # Configuration Tests
//!
//! Defaults, partial JSON, validation and file loading.

use std::io::Write;

use tempfile::NamedTempFile;

use stepvm_core::common::ConfigError;
use stepvm_core::common::constants;
use stepvm_core::config::Config;

#[test]
fn test_defaults_match_machine_constants() {
    let config = Config::default();
    assert_eq!(config.history.max_steps, constants::MAX_HISTORY_LEN);
    assert_eq!(config.history.hash_modulus, constants::HASH_MODULUS);
    assert_eq!(
        config.debugger.full_view_threshold,
        constants::FULL_VIEW_CONFIRM_THRESHOLD
    );
    assert_eq!(config.debugger.window_rows, constants::WINDOW_ROWS);
    assert!(!config.general.trace_steps);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_object_is_all_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.history.max_steps, constants::MAX_HISTORY_LEN);
    assert_eq!(config.debugger.window_rows, constants::WINDOW_ROWS);
}

#[test]
fn test_partial_sections_keep_other_defaults() {
    let config = Config::from_json(
        r#"{ "debugger": { "window_rows": 5 }, "general": { "trace_steps": true } }"#,
    )
    .unwrap();
    assert_eq!(config.debugger.window_rows, 5);
    assert_eq!(
        config.debugger.full_view_threshold,
        constants::FULL_VIEW_CONFIRM_THRESHOLD
    );
    assert_eq!(config.history.hash_modulus, constants::HASH_MODULUS);
    assert!(config.general.trace_steps);
}

#[test]
fn test_zero_modulus_is_rejected() {
    let err = Config::from_json(r#"{ "history": { "hash_modulus": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("hash_modulus")));
}

#[test]
fn test_budget_must_leave_room_for_a_step() {
    let err = Config::from_json(r#"{ "history": { "max_steps": 1 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("max_steps")));
    assert!(Config::from_json(r#"{ "history": { "max_steps": 2 } }"#).is_ok());
}

#[test]
fn test_zero_window_is_rejected() {
    let err = Config::from_json(r#"{ "debugger": { "window_rows": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        Config::from_json("{ history: }"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        Config::from_json(r#"{ "history": { "max_steps": -4 } }"#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{ "history": { "max_steps": 64 } }"#)
        .unwrap();
    file.flush().unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.history.max_steps, 64);
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("vm.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("vm.json"));
}

#[test]
fn test_modulus_is_capped() {
    let at_cap = format!(
        r#"{{ "history": {{ "hash_modulus": {} }} }}"#,
        constants::MAX_HASH_MODULUS
    );
    assert!(Config::from_json(&at_cap).is_ok());

    let err = Config::from_json(r#"{ "history": { "hash_modulus": 16777217 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("hash_modulus")));
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_budget_is_capped_at_slot_width() {
    let err = Config::from_json(r#"{ "history": { "max_steps": 4294967296 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("max_steps")));
    assert!(Config::from_json(r#"{ "history": { "max_steps": 4294967295 } }"#).is_ok());
}
