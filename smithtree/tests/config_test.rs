//! Integration tests for Settings config loading.
//!
//! These tests run against temp files only; the global config and SMITHTREE_*
//! variables of the machine running them are not controlled, so assertions stick
//! to keys the explicit file sets.

use std::fs;

use tempfile::TempDir;

use smithtree::config::{Settings, SettingsError, TraversalOrder};

#[test]
fn given_partial_config_file_when_loading_from_file_then_unset_keys_keep_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("smithtree.toml");
    fs::write(
        &path,
        r#"
[generate]
nodes = 250
seed = 99

[render]
order = "breadth-first"
"#,
    )
    .unwrap();

    let settings = Settings::from_file(&path).expect("load settings");

    assert_eq!(settings.generate.nodes, 250);
    assert_eq!(settings.generate.seed, Some(99));
    assert_eq!(settings.render.order, TraversalOrder::BreadthFirst);
    assert_eq!(settings.generate.max_children, 5);
    assert_eq!(settings.render.max_listed, 50);
}

#[test]
fn given_explicit_config_when_loading_layers_then_explicit_file_applied() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("explicit.toml");
    fs::write(&path, "[generate]\nmax_children = 2\npayload_modulo = 3\n").unwrap();

    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    assert_eq!(settings.generate.max_children, 2);
    assert_eq!(settings.generate.payload_modulo, 3);
}

#[test]
fn given_missing_explicit_config_when_loading_then_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let result = Settings::load(Some(path.as_path()));

    assert!(matches!(result, Err(SettingsError::Read { .. })));
}

#[test]
fn given_malformed_config_when_loading_then_parse_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[render]\norder = \"sideways\"\n").unwrap();

    let err = Settings::from_file(&path).unwrap_err();

    assert!(matches!(err, SettingsError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn given_settings_when_shown_as_toml_then_file_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shown.toml");
    let mut settings = Settings::default();
    settings.generate.seed = Some(7);
    settings.render.order = TraversalOrder::PostOrder;
    fs::write(&path, settings.to_toml().unwrap()).unwrap();

    assert_eq!(Settings::from_file(&path).unwrap(), settings);
}
