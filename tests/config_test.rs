//! Integration tests for Settings config loading.
//!
//! These tests run with temp config files only, so they exercise the
//! explicit-file layer merged over compiled defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use grouptree::application::ApplicationError;
use grouptree::config::Settings;

#[test]
fn given_no_config_file_when_load_then_defaults() {
    let settings = Settings::load(None).expect("load settings");
    assert!(!settings.default_group_type.is_empty());
}

#[test]
fn given_config_file_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grouptree.toml");
    fs::write(
        &path,
        r#"
default_group_type = "organization"
catalog = "/srv/catalog.toml"
sysadmins = ["alice"]
user = "alice"
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.default_group_type, "organization");
    assert_eq!(settings.catalog, Some(PathBuf::from("/srv/catalog.toml")));
    assert!(settings.sysadmins.contains(&"alice".to_string()));
    assert_eq!(settings.user.as_deref(), Some("alice"));
}

#[test]
fn given_catalog_with_tilde_when_load_then_expands_home() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grouptree.toml");
    fs::write(&path, "catalog = \"~/catalog.toml\"\n").unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    let catalog = settings.catalog.unwrap();
    assert!(!catalog.to_string_lossy().starts_with('~'));
    assert!(catalog.ends_with("catalog.toml"));
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let err = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grouptree.toml");
    fs::write(&path, "sysadmins = \"not a list\"\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();
    assert!(err.to_string().starts_with("config error: parse"));
}

#[test]
fn given_settings_when_rendering_toml_then_round_trips_fields() {
    let settings = Settings {
        sysadmins: vec!["alice".into()],
        ..Settings::default()
    };
    let rendered = settings.to_toml().unwrap();
    assert!(rendered.contains("default_group_type = \"group\""));
    assert!(rendered.contains("alice"));
}
