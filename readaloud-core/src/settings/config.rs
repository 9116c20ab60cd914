use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::voice::types::Voice;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BackendConfig {
    #[serde(rename = "edge")]
    Edge {
        #[serde(default = "default_base_url")]
        base_url: String,
    },
    #[serde(rename = "mock")]
    Mock {
        #[serde(default)]
        behavior: crate::tts::mock::MockBehavior,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlaybackSettings {
    /// When true, selecting a non-preset voice resets rate/pitch to
    /// neutral. The shipped behavior leaves the sliders untouched.
    #[serde(default)]
    pub reset_tuning_on_plain_voice: bool,
}

/// A user-defined preset, merged into the catalog after the built-ins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetSpec {
    pub id: String,
    pub name: String,
    pub lang: String,
    pub base_voice_id: String,
    #[serde(default)]
    pub pitch: i32,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub category: String,
}

impl PresetSpec {
    pub fn to_voice(&self) -> Voice {
        Voice::Preset {
            id: self.id.clone(),
            name: self.name.clone(),
            lang: self.lang.clone(),
            base_voice_id: self.base_voice_id.clone(),
            pitch: self.pitch,
            rate: self.rate,
            category: self.category.clone(),
        }
    }
}

/// Core application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// The name of the currently active backend
    #[serde(default)]
    pub active_backend: Option<String>,

    /// Map of backend name to configuration
    #[serde(default)]
    pub backends: HashMap<String, BackendConfig>,

    /// Playback policy knobs
    #[serde(default)]
    pub playback: PlaybackSettings,

    /// Where downloads are written; defaults to the current directory
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// User-defined presets, merged after the built-ins at catalog load
    #[serde(default)]
    pub extra_presets: Vec<PresetSpec>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        let mut backends = HashMap::new();
        backends.insert(
            "edge".to_string(),
            BackendConfig::Edge {
                base_url: default_base_url(),
            },
        );

        Self {
            active_backend: Some("edge".to_string()),
            backends,
            playback: PlaybackSettings::default(),
            download_dir: None,
            extra_presets: Vec::new(),
        }
    }
}

impl Settings {
    /// Get the active backend configuration
    pub fn active_backend(&self) -> Option<&BackendConfig> {
        let backend = self.active_backend.as_ref()?;
        self.backends.get(backend)
    }

    /// Set the active backend (returns error if it doesn't exist)
    pub fn set_active_backend(&mut self, name: &str) -> Result<(), String> {
        if self.backends.contains_key(name) {
            self.active_backend = Some(name.to_string());
            Ok(())
        } else {
            Err(format!("Backend '{name}' not found"))
        }
    }

    /// Add or update a backend configuration
    pub fn add_backend(&mut self, name: String, config: BackendConfig) {
        self.backends.insert(name, config);
    }

    /// Remove a backend configuration
    pub fn remove_backend(&mut self, name: &str) -> Result<(), String> {
        if Some(name) == self.active_backend.as_deref() {
            return Err("Cannot remove the active backend".to_string());
        }

        if self.backends.remove(name).is_some() {
            Ok(())
        } else {
            Err(format!("Backend '{name}' not found"))
        }
    }

    /// List all backend names
    pub fn list_backends(&self) -> Vec<String> {
        self.backends.keys().cloned().collect()
    }
}
