use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::audio::device::DeviceOutput;
use crate::audio::mock::MockOutput;
use crate::audio::AudioOutput;
use crate::session::commands;
use crate::session::events::{EventSender, SessionEvent, SessionMessage};
use crate::session::playback::PlaybackSession;
use crate::settings::config::BackendConfig;
use crate::settings::{Settings, SettingsManager};
use crate::tts::edge::EdgeTts;
use crate::tts::mock::MockSynthesizer;
use crate::tts::wire::{wire_pitch, wire_rate};
use crate::tts::{SynthesisRequest, SynthesizedAudio, Synthesizer};
use crate::voice::{Catalog, Voice, VoiceFilter};

/// Defines the possible input messages to the `SessionActor`.
///
/// These derive serde for use across processes: a front end may run the
/// core in a sub-process and send these over stdin as json.
#[derive(Serialize, Deserialize)]
pub enum SessionActorMessage {
    /// User input: a `/command`, or plain text to set as the text to speak
    UserInput(String),

    /// Sends the current settings (from SettingsManager) to the EventSender
    GetSettings,
    SaveSettings {
        settings: serde_json::Value,
    },
}

/// The `SessionActor` implements the core (or backend) of readaloud.
///
/// Front ends (the CLI, tests) contain no application logic; they are thin
/// wrappers that take input from the user, send it to the actor, and
/// render events from the actor back to the user.
///
/// The interface to the actor is two channels: `SessionActorMessage`s go
/// to the input channel and `SessionEvent`s come out of the output channel
/// returned at launch. The actor task owns every piece of mutable session
/// state - text, catalog, selection, rate/pitch, filter, the playback
/// controller, and the synthesis generation counter.
pub struct SessionActor {
    pub tx: mpsc::UnboundedSender<SessionActorMessage>,
}

impl SessionActor {
    /// Launch the session actor with the real backend and audio device.
    /// Must be called inside a `LocalSet`; the actor task is local because
    /// the audio device handle cannot leave its thread.
    pub fn launch(
        settings_manager: SettingsManager,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        Self::builder()
            .settings_manager(settings_manager)
            .build()
    }

    pub fn builder() -> SessionActorBuilder {
        SessionActorBuilder::default()
    }

    pub fn send_input(&self, input: String) -> Result<()> {
        self.tx.send(SessionActorMessage::UserInput(input))?;
        Ok(())
    }

    pub fn get_settings(&self) -> Result<()> {
        self.tx.send(SessionActorMessage::GetSettings)?;
        Ok(())
    }

    pub fn save_settings(&self, settings: serde_json::Value) -> Result<()> {
        self.tx.send(SessionActorMessage::SaveSettings { settings })?;
        Ok(())
    }
}

/// Builder used by tests to inject a mock synthesizer and audio output.
#[derive(Default)]
pub struct SessionActorBuilder {
    settings_manager: Option<SettingsManager>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    audio_output: Option<Box<dyn AudioOutput>>,
}

impl SessionActorBuilder {
    pub fn settings_manager(mut self, settings_manager: SettingsManager) -> Self {
        self.settings_manager = Some(settings_manager);
        self
    }

    pub fn synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn audio_output(mut self, audio_output: Box<dyn AudioOutput>) -> Self {
        self.audio_output = Some(audio_output);
        self
    }

    pub fn build(self) -> (SessionActor, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (event_sender, event_rx) = EventSender::new();

        tokio::task::spawn_local(async move {
            let settings_manager = match self.settings_manager {
                Some(manager) => manager,
                None => match SettingsManager::new() {
                    Ok(manager) => manager,
                    Err(e) => {
                        error!(?e, "Failed to initialize settings");
                        event_sender.add_message(SessionMessage::error(format!(
                            "Failed to initialize settings: {e:?}"
                        )));
                        return;
                    }
                },
            };

            let settings = settings_manager.settings();
            if settings.active_backend.is_none() && self.synthesizer.is_none() {
                event_sender.add_message(SessionMessage::error(
                    "No TTS backend is configured. Configure one in settings or with /backend add ..."
                        .to_string(),
                ));
            }

            let synthesizer = match self.synthesizer {
                Some(synthesizer) => synthesizer,
                None => match create_synthesizer(&settings_manager, None) {
                    Ok(synthesizer) => synthesizer,
                    Err(e) => {
                        error!("Failed to initialize backend: {}", e);
                        Arc::new(MockSynthesizer::new(
                            crate::tts::mock::MockBehavior::NetworkError,
                        ))
                    }
                },
            };

            let audio_output = match self.audio_output {
                Some(output) => output,
                None => match DeviceOutput::open() {
                    Ok(output) => Box::new(output) as Box<dyn AudioOutput>,
                    Err(e) => {
                        warn!(?e, "Audio device unavailable; playback is disabled");
                        event_sender.add_message(SessionMessage::warning(
                            "No audio output device found; playback is disabled (downloads still work)"
                                .to_string(),
                        ));
                        Box::new(MockOutput::new())
                    }
                },
            };

            let (catalog, degraded) =
                Catalog::load(synthesizer.as_ref(), &settings.extra_presets).await;
            event_sender.send(SessionEvent::CatalogLoaded {
                voices: catalog.len(),
                degraded,
            });

            let selected = catalog.default_selection().cloned();
            let (rate, pitch) = match &selected {
                Some(Voice::Preset { rate, pitch, .. }) => (*rate, *pitch),
                _ => (0.0, 0),
            };
            if let Some(voice) = &selected {
                event_sender.add_message(SessionMessage::system(format!(
                    "Selected voice: {}",
                    voice.name()
                )));
            }

            let (synth_tx, synth_rx) = mpsc::unbounded_channel();

            let actor_state = ActorState {
                event_sender,
                settings: settings_manager,
                synthesizer,
                catalog,
                selected,
                text: String::new(),
                rate,
                pitch,
                filter: VoiceFilter::default(),
                playback: PlaybackSession::new(audio_output),
                generation: 0,
                pending: None,
                synth_tx,
            };

            run_actor(actor_state, rx, synth_rx).await;
        });

        (SessionActor { tx }, event_rx)
    }
}

/// What a finished synthesis is for.
pub enum SynthesisPurpose {
    Play,
    Download { dir: PathBuf },
}

pub struct SynthesisOutcome {
    pub generation: u64,
    pub purpose: SynthesisPurpose,
    pub result: Result<SynthesizedAudio>,
}

pub struct ActorState {
    pub event_sender: EventSender,
    pub settings: SettingsManager,
    pub synthesizer: Arc<dyn Synthesizer>,
    pub catalog: Catalog,
    pub selected: Option<Voice>,
    pub text: String,
    pub rate: f64,
    pub pitch: i32,
    pub filter: VoiceFilter,
    pub playback: PlaybackSession,
    /// Request-generation token: every synthesis start and every parameter
    /// change advances it; only a response carrying the latest value may
    /// mutate playback state.
    pub generation: u64,
    /// The generation of the most recently spawned synthesis, cleared when
    /// its response arrives. Busy-for-front-ends while set.
    pub pending: Option<u64>,
    pub synth_tx: mpsc::UnboundedSender<SynthesisOutcome>,
}

// Actor implementation as free functions
async fn run_actor(
    mut state: ActorState,
    mut rx: mpsc::UnboundedReceiver<SessionActorMessage>,
    mut synth_rx: mpsc::UnboundedReceiver<SynthesisOutcome>,
) {
    info!("SessionActor started");

    let mut tick = tokio::time::interval(Duration::from_millis(200));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // Receive in the arm, handle in the body: a branch body is not
            // part of the select race, so a slow command handler (a backend
            // health probe, a catalog reload) cannot be cancelled mid-await
            // by the playback tick firing.
            message = rx.recv() => {
                let Some(message) = message else {
                    info!("Request queue dropped, session actor shutting down");
                    break;
                };
                if let Err(e) = process_message(message, &mut state).await {
                    error!(?e, "Error processing message");
                    state
                        .event_sender
                        .add_message(SessionMessage::error(format!("Error: {e:?}")));
                }
            }

            Some(outcome) = synth_rx.recv() => {
                handle_synthesis_outcome(&mut state, outcome);
            }

            _ = tick.tick() => {
                if state.playback.tick() {
                    state
                        .event_sender
                        .send(SessionEvent::PlaybackChanged(state.playback.status()));
                }
            }
        }

        state.event_sender.set_busy(state.pending.is_some());
    }
}

async fn process_message(message: SessionActorMessage, state: &mut ActorState) -> Result<()> {
    // Busy goes up at the start of each message so front ends know a turn
    // is in progress; it drops at the loop bottom once nothing is pending.
    state.event_sender.set_busy(true);

    match message {
        SessionActorMessage::UserInput(input) => handle_user_input(state, input).await,
        SessionActorMessage::GetSettings => {
            let settings = state.settings.settings();
            let settings_json = serde_json::to_value(settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize settings: {}", e))?;
            state.event_sender.send(SessionEvent::Settings(settings_json));
            Ok(())
        }
        SessionActorMessage::SaveSettings { settings } => {
            let new_settings: Settings = serde_json::from_value(settings)
                .map_err(|e| anyhow::anyhow!("Failed to deserialize settings: {}", e))?;
            state.settings.update_setting(|s| *s = new_settings);
            state.settings.save()?;
            Ok(())
        }
    }
}

async fn handle_user_input(state: &mut ActorState, input: String) -> Result<()> {
    if input.trim().is_empty() {
        return Ok(());
    }

    if let Some(command) = input.strip_prefix('/') {
        let messages = commands::process_command(state, command).await;
        for message in messages {
            state.event_sender.add_message(message);
        }
        return Ok(());
    }

    // Plain input is the text to speak
    set_text(state, input);
    Ok(())
}

pub(crate) fn set_text(state: &mut ActorState, text: String) {
    let chars = text.chars().count();
    state.text = text;
    apply_parameter_change(state);
    state
        .event_sender
        .add_message(SessionMessage::system(format!("Text set ({chars} chars)")));
}

/// Any edit to text, voice, rate, or pitch: stale audio must never play
/// and in-flight responses for the old parameters must never attach.
pub(crate) fn apply_parameter_change(state: &mut ActorState) {
    state.generation += 1;
    if state.playback.state() != crate::session::playback::PlaybackState::Idle
        || state.playback.has_audio()
    {
        state.playback.invalidate();
        state
            .event_sender
            .send(SessionEvent::PlaybackChanged(state.playback.status()));
    }
}

/// Issue a synthesis request for the current (text, voice, rate, pitch)
/// tuple. Preconditions (non-empty text, voice selected) are the caller's.
pub(crate) fn start_synthesis(state: &mut ActorState, purpose: SynthesisPurpose) {
    let Some(voice) = &state.selected else {
        return;
    };

    state.generation += 1;
    let generation = state.generation;
    state.pending = Some(generation);

    let request = SynthesisRequest {
        text: state.text.clone(),
        voice: voice.synthesis_voice_id().to_string(),
        rate: wire_rate(state.rate),
        pitch: wire_pitch(state.pitch),
    };

    if matches!(purpose, SynthesisPurpose::Play) {
        state.playback.begin_loading();
        state
            .event_sender
            .send(SessionEvent::PlaybackChanged(state.playback.status()));
    }

    debug!(generation, voice = %request.voice, rate = %request.rate, pitch = %request.pitch, "Starting synthesis");

    let synthesizer = state.synthesizer.clone();
    let synth_tx = state.synth_tx.clone();
    tokio::spawn(async move {
        let result = synthesizer.synthesize(request).await;
        let _ = synth_tx.send(SynthesisOutcome {
            generation,
            purpose,
            result,
        });
    });
}

fn handle_synthesis_outcome(state: &mut ActorState, outcome: SynthesisOutcome) {
    if state.pending == Some(outcome.generation) {
        state.pending = None;
    }

    // Stale response: a parameter change or a newer request superseded it
    if outcome.generation != state.generation {
        debug!(
            generation = outcome.generation,
            current = state.generation,
            "Discarding stale synthesis response"
        );
        return;
    }

    match outcome.purpose {
        SynthesisPurpose::Play => match outcome.result {
            Ok(audio) => {
                if let Err(e) = state.playback.attach_and_play(audio.bytes) {
                    error!(?e, "Failed to attach synthesized audio");
                    state.playback.cancel_loading();
                    state
                        .event_sender
                        .alert(format!("Could not play the generated audio: {e}"));
                }
                state
                    .event_sender
                    .send(SessionEvent::PlaybackChanged(state.playback.status()));
            }
            Err(e) => {
                error!(?e, "Synthesis failed");
                state.playback.cancel_loading();
                state.event_sender.alert(format!(
                    "Speech generation failed: {e}. Is the backend running?"
                ));
                state
                    .event_sender
                    .send(SessionEvent::PlaybackChanged(state.playback.status()));
            }
        },
        SynthesisPurpose::Download { dir } => match outcome.result {
            Ok(audio) => match write_download(&dir, &audio) {
                Ok(path) => {
                    let path = path.display().to_string();
                    state
                        .event_sender
                        .add_message(SessionMessage::system(format!("Saved {path}")));
                    state.event_sender.send(SessionEvent::Downloaded { path });
                }
                Err(e) => {
                    error!(?e, "Failed to write download");
                    state
                        .event_sender
                        .alert(format!("Failed to save audio: {e}"));
                }
            },
            Err(e) => {
                error!(?e, "Synthesis failed");
                state.event_sender.alert(format!(
                    "Speech generation failed: {e}. Is the backend running?"
                ));
            }
        },
    }
}

fn write_download(dir: &PathBuf, audio: &SynthesizedAudio) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(download_file_name(audio.file_extension()));
    std::fs::write(&path, &audio.bytes)?;
    Ok(path)
}

/// Download naming convention: `voice-<unix-epoch-ms>.<ext>`.
pub fn download_file_name(extension: &str) -> String {
    format!("voice-{}.{extension}", Utc::now().timestamp_millis())
}

/// Initializes the backend with the given name if it exists in settings,
/// else raises an error. `None` uses the active backend.
pub fn create_synthesizer(
    settings: &SettingsManager,
    backend: Option<&str>,
) -> Result<Arc<dyn Synthesizer>> {
    let config = settings.settings();
    let name = match backend {
        Some(name) => name.to_string(),
        None => match &config.active_backend {
            Some(name) => name.clone(),
            None => bail!("No active backend configured in settings"),
        },
    };

    let Some(backend_config) = config.backends.get(&name) else {
        bail!("Backend '{name}' not found in settings")
    };

    match backend_config {
        BackendConfig::Edge { base_url } => {
            if base_url.is_empty() {
                bail!("Backend base_url is empty")
            }
            Ok(Arc::new(EdgeTts::new(base_url.clone())))
        }
        BackendConfig::Mock { behavior } => {
            Ok(Arc::new(MockSynthesizer::new(behavior.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_name_convention() {
        let name = download_file_name("mp3");
        assert!(name.starts_with("voice-"));
        assert!(name.ends_with(".mp3"));

        let millis: u64 = name
            .strip_prefix("voice-")
            .unwrap()
            .strip_suffix(".mp3")
            .unwrap()
            .parse()
            .unwrap();
        // Epoch millis, not seconds
        assert!(millis > 1_600_000_000_000);
    }
}
