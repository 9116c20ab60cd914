use serde::{Deserialize, Serialize};

/// A selectable voice in the catalog.
///
/// These derive serde for use across processes: front ends in other
/// processes receive voices inside session events serialized to json. The
/// `source` tag is the variant discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum Voice {
    /// A local synthesis voice. Present in the data model for front ends
    /// that have one; no local synthesis path exists, so nothing in the
    /// session constructs these.
    Browser { id: String, name: String, lang: String },

    /// A raw neural voice reported by the remote backend.
    Server { id: String, name: String, lang: String },

    /// A curated identity: a server voice plus fixed pitch/rate offsets
    /// applied when the preset is selected.
    Preset {
        id: String,
        name: String,
        lang: String,
        base_voice_id: String,
        /// Pitch offset in Hz.
        pitch: i32,
        /// Rate offset as a fraction, roughly [-0.5, 0.5].
        rate: f64,
        category: String,
    },
}

impl Voice {
    pub fn id(&self) -> &str {
        match self {
            Voice::Browser { id, .. } | Voice::Server { id, .. } | Voice::Preset { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Voice::Browser { name, .. }
            | Voice::Server { name, .. }
            | Voice::Preset { name, .. } => name,
        }
    }

    pub fn lang(&self) -> &str {
        match self {
            Voice::Browser { lang, .. }
            | Voice::Server { lang, .. }
            | Voice::Preset { lang, .. } => lang,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Voice::Preset { category, .. } => Some(category.as_str()),
            _ => None,
        }
    }

    pub fn is_preset(&self) -> bool {
        matches!(self, Voice::Preset { .. })
    }

    /// The voice id sent to the backend: presets synthesize with their base
    /// voice, everything else with its own id.
    pub fn synthesis_voice_id(&self) -> &str {
        match self {
            Voice::Preset { base_voice_id, .. } => base_voice_id,
            other => other.id(),
        }
    }

    /// The gender tag embedded in the display name, if any. This is a
    /// display convention of server-sourced names ("Aria (Female)"), not a
    /// structured field; presets usually carry no marker.
    pub fn gender_tag(&self) -> Option<&'static str> {
        let name = self.name();
        if name.contains("(Male)") {
            Some("Male")
        } else if name.contains("(Female)") {
            Some("Female")
        } else {
            None
        }
    }
}
