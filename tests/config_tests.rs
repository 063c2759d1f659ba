//! Integration tests for settings persistence and document loading
//!
//! Test Organization:
//! - Settings loading and fallback
//! - Settings saving
//! - Document loading into a session

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use tempfile::TempDir;
use xccdf_tailor::config::{EditorSettings, SettingsManager};
use xccdf_tailor::error::ConfigError;
use xccdf_tailor::tailoring::TailoringSession;
use xccdf_tailor::xccdf::{loader, Policy};

const DOCUMENT: &str = r#"{
    "benchmark": {
        "id": "xccdf_org.test_benchmark",
        "title": [{ "lang": "en-US", "text": "Test Benchmark" }],
        "content": [
            {
                "kind": "group",
                "id": "grp_net",
                "title": [{ "lang": "de-DE", "text": "Netzwerk" }, { "lang": "en-US", "text": "Network" }],
                "content": [
                    { "kind": "rule", "id": "rule_fw", "title": [{ "lang": "en-US", "text": "Enable firewall" }] }
                ],
                "values": [
                    { "id": "var_port", "type": "number", "instances": [{ "value": "22" }, { "selector": "alt", "value": "2222" }] }
                ]
            }
        ]
    },
    "profile": {
        "id": "xccdf_org.test_profile",
        "title": [{ "lang": "en-US", "text": "Test Profile" }],
        "setvalues": [{ "item": "var_port", "value": "2200" }]
    }
}"#;

// ============================================================================
// Settings loading and fallback
// ============================================================================

#[test]
fn test_missing_settings_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings = SettingsManager::load_from(&temp_dir.path().join("settings.json")).unwrap();
    assert_eq!(settings, EditorSettings::default());
}

#[test]
fn test_corrupt_settings_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    fs::write(&path, "{ \"default_language\": ").unwrap();

    let settings = SettingsManager::load_from(&path).unwrap();
    assert_eq!(settings, EditorSettings::default());
}

#[test]
fn test_wrong_extension_is_an_error() {
    let result = SettingsManager::load_from(std::path::Path::new("settings.yaml"));
    assert!(matches!(result, Err(ConfigError::ValidationFailed(_))));
}

// ============================================================================
// Settings saving
// ============================================================================

#[test]
fn test_settings_round_trip_through_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("xccdf-tailor/settings.json");

    let settings = EditorSettings {
        default_language: "de-DE".to_string(),
        expand_all_on_open: false,
        show_undo_history: true,
        window_width: 1280.0,
        window_height: 720.0,
        debug_logging: true,
    };
    SettingsManager::save_to(&settings, &path).unwrap();
    assert_eq!(SettingsManager::load_from(&path).unwrap(), settings);
}

// ============================================================================
// Document loading into a session
// ============================================================================

#[test]
fn test_loaded_document_opens_in_session() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("benchmark.json");
    fs::write(&path, DOCUMENT).unwrap();

    let (benchmark, profile) = loader::load_document(&path).unwrap();
    let benchmark = Rc::new(benchmark);
    let policy = Rc::new(RefCell::new(Policy::new(Rc::clone(&benchmark), profile)));

    let settings = EditorSettings {
        default_language: "de-DE".to_string(),
        expand_all_on_open: false,
        ..EditorSettings::default()
    };
    let mut session =
        TailoringSession::new(Some(policy), Some(benchmark), false, &settings).unwrap();

    let tree = session.tree();
    let group = tree.node(tree.node_for_item("grp_net").unwrap()).unwrap();
    assert_eq!(group.label(), "Netzwerk");
    assert!(!group.is_expanded());

    // Values come before rules under the same parent
    let children: Vec<&str> = group
        .children()
        .iter()
        .map(|c| tree.node(*c).unwrap().id_text())
        .collect();
    assert_eq!(children, vec!["var_port", "rule_fw"]);

    let port = session.tree().node_for_item("var_port").unwrap();
    session.select_item(Some(port)).unwrap();
    let value = session.item_panel().value().unwrap();
    assert_eq!(value.text(), "2200");
    assert_eq!(value.instances, vec!["22".to_string(), "2222".to_string()]);
    assert_eq!(value.type_label, "(number)");
}

#[test]
fn test_document_with_wrong_extension_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("benchmark.xml");
    fs::write(&path, DOCUMENT).unwrap();
    assert!(matches!(
        loader::load_document(&path),
        Err(ConfigError::ValidationFailed(_))
    ));
}
