use crate::settings::config::{BackendConfig, PresetSpec, Settings};
use crate::settings::manager::SettingsManager;
use tempfile::TempDir;

#[test]
fn default_settings_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();
    assert!(settings_path.exists());

    let settings = manager.settings();
    assert_eq!(settings.active_backend.as_deref(), Some("edge"));
    assert!(matches!(
        settings.active_backend(),
        Some(BackendConfig::Edge { .. })
    ));

    // A fresh manager over the same file sees the same settings
    let reload = SettingsManager::from_path(settings_path).unwrap();
    assert_eq!(
        reload.settings().active_backend,
        manager.settings().active_backend
    );
}

#[test]
fn corrupted_settings_backed_up_and_reset() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");

    std::fs::write(&settings_path, "this is { not toml").unwrap();

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();
    assert_eq!(manager.settings().active_backend.as_deref(), Some("edge"));

    let backup_path = settings_path.with_extension("toml.backup");
    assert!(backup_path.exists());
    assert_eq!(
        std::fs::read_to_string(backup_path).unwrap(),
        "this is { not toml"
    );
}

#[test]
fn backend_map_operations() {
    let mut settings = Settings::default();

    settings.add_backend(
        "mock".to_string(),
        BackendConfig::Mock {
            behavior: Default::default(),
        },
    );
    assert!(settings.set_active_backend("mock").is_ok());
    assert!(settings.set_active_backend("missing").is_err());

    assert!(settings.remove_backend("mock").is_err()); // active
    assert!(settings.remove_backend("edge").is_ok());
    assert!(settings.remove_backend("edge").is_err()); // already gone
}

#[test]
fn extra_presets_persist() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();
    manager.update_setting(|s| {
        s.extra_presets.push(PresetSpec {
            id: "preset-mine".to_string(),
            name: "My Narrator".to_string(),
            lang: "en-GB".to_string(),
            base_voice_id: "en-GB-SoniaNeural".to_string(),
            pitch: -5,
            rate: 0.05,
            category: "custom".to_string(),
        });
    });
    manager.save().unwrap();

    let reload = SettingsManager::from_path(settings_path).unwrap();
    let presets = reload.settings().extra_presets;
    assert_eq!(presets.len(), 1);
    assert_eq!(presets[0].id, "preset-mine");
    assert_eq!(presets[0].to_voice().synthesis_voice_id(), "en-GB-SoniaNeural");
}

#[test]
fn mock_backend_config_round_trips_through_toml() {
    let mut settings = Settings::default();
    settings.add_backend(
        "mock".to_string(),
        BackendConfig::Mock {
            behavior: crate::tts::mock::MockBehavior::HttpError { status: 500 },
        },
    );

    let toml = toml::to_string_pretty(&settings).unwrap();
    let back: Settings = toml::from_str(&toml).unwrap();
    match back.backends.get("mock") {
        Some(BackendConfig::Mock {
            behavior: crate::tts::mock::MockBehavior::HttpError { status },
        }) => assert_eq!(*status, 500),
        other => panic!("unexpected backend config: {other:?}"),
    }
}
