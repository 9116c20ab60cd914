use tracing::{info, warn};

use crate::settings::config::PresetSpec;
use crate::tts::Synthesizer;
use crate::voice::presets::built_in_presets;
use crate::voice::types::Voice;

/// The default-selection marker: with no presets configured, prefer the
/// server voice whose id contains this substring.
const DEFAULT_VOICE_MARKER: &str = "Guy";

/// The session's in-memory voice list: built-in presets, user presets from
/// settings, then whatever the backend reported, in backend order.
/// Assembled once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    voices: Vec<Voice>,
}

impl Catalog {
    /// Assemble the catalog. A failed voice-list fetch degrades to a
    /// presets-only catalog; the failure is logged, never surfaced as an
    /// error state. Returns the catalog and whether it is degraded.
    pub async fn load(synthesizer: &dyn Synthesizer, extra_presets: &[PresetSpec]) -> (Self, bool) {
        let mut voices = built_in_presets();
        voices.extend(extra_presets.iter().map(PresetSpec::to_voice));

        let degraded = match synthesizer.list_voices().await {
            Ok(remote) => {
                info!(count = remote.len(), "Loaded server voice list");
                voices.extend(remote.into_iter().map(|v| Voice::Server {
                    name: format!("{} ({})", v.short_name, v.gender),
                    lang: v.locale,
                    id: v.short_name,
                }));
                false
            }
            Err(e) => {
                warn!(?e, "Voice list fetch failed; catalog degrades to presets only");
                true
            }
        };

        (Self { voices }, degraded)
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id() == id)
    }

    /// Default-selection heuristic: first preset, else the first server
    /// voice whose id carries the marker, else the first server voice,
    /// else none. Callers must handle "no voice selected".
    pub fn default_selection(&self) -> Option<&Voice> {
        self.voices
            .iter()
            .find(|v| v.is_preset())
            .or_else(|| {
                self.voices.iter().find(|v| {
                    matches!(v, Voice::Server { .. }) && v.id().contains(DEFAULT_VOICE_MARKER)
                })
            })
            .or_else(|| self.voices.iter().find(|v| matches!(v, Voice::Server { .. })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::mock::{MockBehavior, MockSynthesizer};
    use crate::tts::RemoteVoice;

    #[tokio::test]
    async fn presets_sort_ahead_of_server_voices() {
        let synth = MockSynthesizer::new(MockBehavior::Success);
        let (catalog, degraded) = Catalog::load(&synth, &[]).await;

        assert!(!degraded);
        let presets = built_in_presets().len();
        assert!(catalog.len() > presets);
        assert!(catalog.voices()[..presets].iter().all(Voice::is_preset));
        assert!(matches!(catalog.voices()[presets], Voice::Server { .. }));
    }

    #[tokio::test]
    async fn server_names_embed_gender_tag() {
        let synth = MockSynthesizer::new(MockBehavior::Success);
        let (catalog, _) = Catalog::load(&synth, &[]).await;

        let aria = catalog.find("en-US-AriaNeural").unwrap();
        assert_eq!(aria.name(), "en-US-AriaNeural (Female)");
        assert_eq!(aria.lang(), "en-US");
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_presets_only() {
        let synth = MockSynthesizer::new(MockBehavior::ListFailure);
        let (catalog, degraded) = Catalog::load(&synth, &[]).await;

        assert!(degraded);
        assert_eq!(catalog.len(), built_in_presets().len());
        assert!(catalog.voices().iter().all(Voice::is_preset));
    }

    #[tokio::test]
    async fn default_selection_prefers_first_preset() {
        let synth = MockSynthesizer::new(MockBehavior::Success);
        let (catalog, _) = Catalog::load(&synth, &[]).await;

        assert_eq!(catalog.default_selection().unwrap().id(), "preset-lincoln");
    }

    #[tokio::test]
    async fn default_selection_marker_without_presets() {
        // A presets-only degrade is the only path to an empty preset list
        // through load(), so exercise the heuristic on a hand-built catalog.
        let catalog = Catalog {
            voices: vec![
                Voice::Server {
                    id: "en-US-AriaNeural".to_string(),
                    name: "en-US-AriaNeural (Female)".to_string(),
                    lang: "en-US".to_string(),
                },
                Voice::Server {
                    id: "en-US-GuyNeural".to_string(),
                    name: "en-US-GuyNeural (Male)".to_string(),
                    lang: "en-US".to_string(),
                },
            ],
        };
        assert_eq!(catalog.default_selection().unwrap().id(), "en-US-GuyNeural");

        let no_marker = Catalog {
            voices: vec![Voice::Server {
                id: "en-US-AriaNeural".to_string(),
                name: "en-US-AriaNeural (Female)".to_string(),
                lang: "en-US".to_string(),
            }],
        };
        assert_eq!(
            no_marker.default_selection().unwrap().id(),
            "en-US-AriaNeural"
        );

        assert!(Catalog::default().default_selection().is_none());
    }

    #[tokio::test]
    async fn user_presets_merge_after_built_ins() {
        let synth = MockSynthesizer::new(MockBehavior::ListFailure);
        let spec = PresetSpec {
            id: "preset-mine".to_string(),
            name: "My Narrator".to_string(),
            lang: "en-GB".to_string(),
            base_voice_id: "en-GB-SoniaNeural".to_string(),
            pitch: -5,
            rate: 0.05,
            category: "custom".to_string(),
        };
        let (catalog, _) = Catalog::load(&synth, &[spec]).await;

        let built_ins = built_in_presets().len();
        assert_eq!(catalog.len(), built_ins + 1);
        assert_eq!(catalog.voices()[built_ins].id(), "preset-mine");
    }

    #[tokio::test]
    async fn mock_voices_stay_in_backend_order() {
        let synth = MockSynthesizer::new(MockBehavior::Success);
        synth.set_voices(vec![
            RemoteVoice {
                short_name: "b-voice".to_string(),
                gender: "Male".to_string(),
                locale: "en-US".to_string(),
                name: None,
            },
            RemoteVoice {
                short_name: "a-voice".to_string(),
                gender: "Female".to_string(),
                locale: "en-US".to_string(),
                name: None,
            },
        ]);
        let (catalog, _) = Catalog::load(&synth, &[]).await;

        let server_ids: Vec<&str> = catalog
            .voices()
            .iter()
            .filter(|v| matches!(v, Voice::Server { .. }))
            .map(Voice::id)
            .collect();
        assert_eq!(server_ids, vec!["b-voice", "a-voice"]);
    }
}
