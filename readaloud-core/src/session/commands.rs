use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::extract;
use crate::session::actor::{
    self, create_synthesizer, ActorState, SynthesisPurpose,
};
use crate::session::events::{MessageSender, SessionEvent, SessionMessage, VoiceCard};
use crate::tts::wire::{wire_pitch, wire_rate};
use crate::voice::filter::{available_categories, available_languages, filter_voices};
use crate::voice::{Catalog, GenderFilter, Voice};

#[derive(Clone, Debug)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
    pub usage: String,
}

/// Process a command and directly mutate the actor state
pub async fn process_command(state: &mut ActorState, command: &str) -> Vec<SessionMessage> {
    let parts: Vec<&str> = command.split_whitespace().collect();
    if parts.is_empty() {
        return vec![];
    }

    match parts[0] {
        "help" => handle_help_command(),
        "voices" => handle_voices_command(state),
        "voice" => handle_voice_command(state, &parts),
        "search" => handle_search_command(state, command),
        "filter" => handle_filter_command(state, &parts),
        "rate" => handle_rate_command(state, &parts),
        "pitch" => handle_pitch_command(state, &parts),
        "text" => handle_text_command(state, command),
        "load" => handle_load_command(state, &parts),
        "play" => handle_play_command(state),
        "pause" => handle_pause_command(state),
        "stop" => handle_stop_command(state),
        "seek" => handle_seek_command(state, &parts),
        "download" => handle_download_command(state, &parts),
        "status" => handle_status_command(state),
        "backend" => handle_backend_command(state, &parts).await,
        "health" => handle_health_command(state).await,
        "settings" => handle_settings_command(state),
        _ => vec![create_message(
            format!("Unknown command: /{}", parts[0]),
            MessageSender::Error,
        )],
    }
}

/// Get all available commands with their descriptions
pub fn get_available_commands() -> Vec<CommandInfo> {
    let info = |name: &str, description: &str, usage: &str| CommandInfo {
        name: name.to_string(),
        description: description.to_string(),
        usage: usage.to_string(),
    };

    vec![
        info("voices", "List voices matching the current filter", "/voices"),
        info("voice", "Select a voice by id", "/voice <id>"),
        info("search", "Set the voice search term (empty clears)", "/search [term]"),
        info(
            "filter",
            "Set a gallery filter",
            "/filter <gender|language|category> <value|all> | /filter clear",
        ),
        info("rate", "Set the speaking rate offset (-0.5 to 0.5)", "/rate <fraction>"),
        info("pitch", "Set the pitch offset in Hz (-50 to 50)", "/pitch <hz>"),
        info("text", "Set the text to speak (plain input works too)", "/text <text>"),
        info("load", "Load text from a txt/md/pdf/docx file", "/load <path>"),
        info("play", "Play the current text, or pause if playing", "/play"),
        info("pause", "Pause playback", "/pause"),
        info("stop", "Stop playback and reset to the start", "/stop"),
        info("seek", "Seek to a position in seconds", "/seek <seconds>"),
        info("download", "Synthesize and save to a file", "/download [dir]"),
        info("status", "Show the session status", "/status"),
        info("backend", "List or switch the active TTS backend", "/backend [name]"),
        info("health", "Probe the backend health endpoint", "/health"),
        info("settings", "Display current settings", "/settings"),
        info("help", "Show this help message", "/help"),
        info("quit", "Exit the application", "/quit or /exit"),
    ]
}

fn create_message(content: String, sender: MessageSender) -> SessionMessage {
    match sender {
        MessageSender::User => SessionMessage::user(content),
        MessageSender::System => SessionMessage::system(content),
        MessageSender::Warning => SessionMessage::warning(content),
        MessageSender::Error => SessionMessage::error(content),
    }
}

fn handle_help_command() -> Vec<SessionMessage> {
    let mut help = String::from("Available commands:\n");
    for command in get_available_commands() {
        help.push_str(&format!("  {:<42} {}\n", command.usage, command.description));
    }
    vec![create_message(help, MessageSender::System)]
}

fn handle_voices_command(state: &mut ActorState) -> Vec<SessionMessage> {
    let shown = filter_voices(state.catalog.voices(), &state.filter);
    let selected_id = state.selected.as_ref().map(|v| v.id().to_string());

    let cards: Vec<VoiceCard> = shown
        .iter()
        .map(|v| VoiceCard::from_voice(v, selected_id.as_deref() == Some(v.id())))
        .collect();

    let total = state
        .catalog
        .voices()
        .iter()
        .filter(|v| !matches!(v, Voice::Browser { .. }))
        .count();

    let message = format!(
        "{} of {} voices (filter: {})",
        cards.len(),
        total,
        state.filter.describe()
    );

    state.event_sender.send(SessionEvent::VoiceList {
        voices: cards,
        total,
    });

    vec![create_message(message, MessageSender::System)]
}

fn handle_voice_command(state: &mut ActorState, parts: &[&str]) -> Vec<SessionMessage> {
    let Some(id) = parts.get(1) else {
        return vec![create_message(
            "Usage: /voice <id>".to_string(),
            MessageSender::Error,
        )];
    };

    let Some(voice) = state.catalog.find(id).cloned() else {
        return vec![create_message(
            format!("Voice '{id}' not found. Use /voices to list the catalog."),
            MessageSender::Error,
        )];
    };

    let mut content = format!("Selected voice: {}", voice.name());

    // Selecting a preset copies its tuning into the sliders. A plain
    // voice leaves them untouched unless the reset policy is enabled.
    match &voice {
        Voice::Preset { rate, pitch, .. } => {
            state.rate = *rate;
            state.pitch = *pitch;
            content.push_str(&format!(" (rate {}, pitch {})", wire_rate(*rate), wire_pitch(*pitch)));
        }
        _ => {
            if state.settings.settings().playback.reset_tuning_on_plain_voice {
                state.rate = 0.0;
                state.pitch = 0;
            }
        }
    }

    state.selected = Some(voice);
    actor::apply_parameter_change(state);

    vec![create_message(content, MessageSender::System)]
}

fn handle_search_command(state: &mut ActorState, command: &str) -> Vec<SessionMessage> {
    let term = command.strip_prefix("search").unwrap_or("").trim();
    state.filter.search = term.to_string();

    let content = if term.is_empty() {
        "Search cleared".to_string()
    } else {
        format!("Search set to \"{term}\"")
    };
    let mut messages = vec![create_message(content, MessageSender::System)];
    messages.extend(handle_voices_command(state));
    messages
}

fn handle_filter_command(state: &mut ActorState, parts: &[&str]) -> Vec<SessionMessage> {
    let usage = || {
        vec![create_message(
            "Usage: /filter <gender|language|category> <value|all>, or /filter clear".to_string(),
            MessageSender::Error,
        )]
    };

    let Some(field) = parts.get(1) else {
        return usage();
    };

    if *field == "clear" {
        state.filter = Default::default();
        let mut messages = vec![create_message(
            "Filters cleared".to_string(),
            MessageSender::System,
        )];
        messages.extend(handle_voices_command(state));
        return messages;
    }

    let Some(value) = parts.get(2) else {
        // With no value, show the available options for the field
        return match *field {
            "gender" => vec![create_message(
                "Gender options: All, Male, Female".to_string(),
                MessageSender::System,
            )],
            "language" => vec![create_message(
                format!(
                    "Language options: All, {}",
                    available_languages(state.catalog.voices()).join(", ")
                ),
                MessageSender::System,
            )],
            "category" => vec![create_message(
                format!(
                    "Category options: All, Standard, {}",
                    available_categories(state.catalog.voices()).join(", ")
                ),
                MessageSender::System,
            )],
            _ => usage(),
        };
    };

    let all = value.eq_ignore_ascii_case("all");
    match *field {
        "gender" => match GenderFilter::from_str(value) {
            Ok(gender) => state.filter.gender = gender,
            Err(_) => {
                return vec![create_message(
                    format!("Unknown gender '{value}' (All, Male, Female)"),
                    MessageSender::Error,
                )]
            }
        },
        "language" => {
            state.filter.language = if all { None } else { Some(value.to_string()) };
        }
        "category" => {
            state.filter.category = if all { None } else { Some(value.to_string()) };
        }
        _ => return usage(),
    }

    let mut messages = vec![create_message(
        format!("Filter: {}", state.filter.describe()),
        MessageSender::System,
    )];
    messages.extend(handle_voices_command(state));
    messages
}

fn handle_rate_command(state: &mut ActorState, parts: &[&str]) -> Vec<SessionMessage> {
    let Some(value) = parts.get(1).and_then(|v| v.parse::<f64>().ok()) else {
        return vec![create_message(
            "Usage: /rate <fraction between -0.5 and 0.5>".to_string(),
            MessageSender::Error,
        )];
    };

    state.rate = value.clamp(-0.5, 0.5);
    actor::apply_parameter_change(state);
    vec![create_message(
        format!("Rate set to {}", wire_rate(state.rate)),
        MessageSender::System,
    )]
}

fn handle_pitch_command(state: &mut ActorState, parts: &[&str]) -> Vec<SessionMessage> {
    let Some(value) = parts.get(1).and_then(|v| v.parse::<i32>().ok()) else {
        return vec![create_message(
            "Usage: /pitch <Hz between -50 and 50>".to_string(),
            MessageSender::Error,
        )];
    };

    state.pitch = value.clamp(-50, 50);
    actor::apply_parameter_change(state);
    vec![create_message(
        format!("Pitch set to {}", wire_pitch(state.pitch)),
        MessageSender::System,
    )]
}

fn handle_text_command(state: &mut ActorState, command: &str) -> Vec<SessionMessage> {
    let text = command.strip_prefix("text").unwrap_or("").trim();
    if text.is_empty() {
        return vec![create_message(
            "Usage: /text <text to speak>".to_string(),
            MessageSender::Error,
        )];
    }

    actor::set_text(state, text.to_string());
    vec![]
}

fn handle_load_command(state: &mut ActorState, parts: &[&str]) -> Vec<SessionMessage> {
    let Some(path) = parts.get(1) else {
        return vec![create_message(
            "Usage: /load <path to .txt/.md/.pdf/.docx>".to_string(),
            MessageSender::Error,
        )];
    };

    match extract::extract_text(std::path::Path::new(path)) {
        Ok(text) => {
            actor::set_text(state, text);
            vec![]
        }
        Err(e) => {
            state.event_sender.alert(format!("Could not load {path}: {e}"));
            vec![create_message(
                format!("Could not load {path}: {e}"),
                MessageSender::Error,
            )]
        }
    }
}

fn handle_play_command(state: &mut ActorState) -> Vec<SessionMessage> {
    // Play while playing pauses instead of double-starting
    if state.playback.is_playing() {
        state.playback.pause();
        state
            .event_sender
            .send(SessionEvent::PlaybackChanged(state.playback.status()));
        return vec![];
    }

    // A synthesis is already on its way; its response will attach
    if state.playback.is_loading() {
        return vec![];
    }

    // Resume the live resource without re-synthesizing
    match state.playback.resume() {
        Ok(true) => {
            state
                .event_sender
                .send(SessionEvent::PlaybackChanged(state.playback.status()));
            return vec![];
        }
        Ok(false) => {}
        Err(e) => {
            state
                .event_sender
                .alert(format!("Could not play the generated audio: {e}"));
            return vec![];
        }
    }

    // Missing preconditions are a silent no-op, not an error
    if state.text.trim().is_empty() || state.selected.is_none() {
        debug!("Play ignored: no text or no voice selected");
        return vec![];
    }

    actor::start_synthesis(state, SynthesisPurpose::Play);
    vec![create_message(
        "Generating speech...".to_string(),
        MessageSender::System,
    )]
}

fn handle_pause_command(state: &mut ActorState) -> Vec<SessionMessage> {
    state.playback.pause();
    state
        .event_sender
        .send(SessionEvent::PlaybackChanged(state.playback.status()));
    vec![]
}

fn handle_stop_command(state: &mut ActorState) -> Vec<SessionMessage> {
    state.playback.stop();
    state
        .event_sender
        .send(SessionEvent::PlaybackChanged(state.playback.status()));
    vec![]
}

fn handle_seek_command(state: &mut ActorState, parts: &[&str]) -> Vec<SessionMessage> {
    let Some(seconds) = parts.get(1).and_then(|v| v.parse::<f64>().ok()) else {
        return vec![create_message(
            "Usage: /seek <seconds>".to_string(),
            MessageSender::Error,
        )];
    };

    if let Err(e) = state.playback.seek(seconds) {
        return vec![create_message(format!("Seek failed: {e}"), MessageSender::Error)];
    }
    state
        .event_sender
        .send(SessionEvent::PlaybackChanged(state.playback.status()));
    vec![]
}

fn handle_download_command(state: &mut ActorState, parts: &[&str]) -> Vec<SessionMessage> {
    if state.text.trim().is_empty() || state.selected.is_none() {
        debug!("Download ignored: no text or no voice selected");
        return vec![];
    }

    let dir = match parts.get(1) {
        Some(dir) => PathBuf::from(dir),
        None => match state.settings.settings().download_dir {
            Some(dir) => dir,
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        },
    };

    actor::start_synthesis(state, SynthesisPurpose::Download { dir });
    vec![create_message(
        "Generating speech for download...".to_string(),
        MessageSender::System,
    )]
}

fn handle_status_command(state: &mut ActorState) -> Vec<SessionMessage> {
    let voice = state
        .selected
        .as_ref()
        .map(|v| format!("{} ({})", v.name(), v.id()))
        .unwrap_or_else(|| "none".to_string());

    let status = state.playback.status();
    let duration = status
        .duration
        .map(|d| format!("{d:.1}s"))
        .unwrap_or_else(|| "unknown".to_string());

    let content = format!(
        "Backend: {}\nVoice: {}\nText: {} chars\nRate: {}  Pitch: {}\nPlayback: {:?} at {:.1}s of {}\nFilter: {}",
        state.synthesizer.name(),
        voice,
        state.text.chars().count(),
        wire_rate(state.rate),
        wire_pitch(state.pitch),
        status.state,
        status.position,
        duration,
        state.filter.describe(),
    );

    state
        .event_sender
        .send(SessionEvent::PlaybackChanged(status));
    vec![create_message(content, MessageSender::System)]
}

async fn handle_backend_command(state: &mut ActorState, parts: &[&str]) -> Vec<SessionMessage> {
    let Some(name) = parts.get(1) else {
        let settings = state.settings.settings();
        let mut names: Vec<String> = settings.backends.keys().cloned().collect();
        names.sort();
        let active = settings.active_backend.unwrap_or_else(|| "none".to_string());
        return vec![create_message(
            format!("Backends: {} (active: {active})", names.join(", ")),
            MessageSender::System,
        )];
    };

    let synthesizer = match create_synthesizer(&state.settings, Some(name)) {
        Ok(synthesizer) => synthesizer,
        Err(e) => {
            return vec![create_message(
                format!("Failed to switch backend: {e}"),
                MessageSender::Error,
            )]
        }
    };

    state.synthesizer = synthesizer;
    actor::apply_parameter_change(state);

    // The catalog belongs to the backend that produced it: reload, and
    // keep the selection only if the new catalog still has it.
    let extra_presets = state.settings.settings().extra_presets;
    let (catalog, degraded) =
        Catalog::load(state.synthesizer.as_ref(), &extra_presets).await;
    state.event_sender.send(SessionEvent::CatalogLoaded {
        voices: catalog.len(),
        degraded,
    });

    let still_selected = state
        .selected
        .as_ref()
        .and_then(|v| catalog.find(v.id()).cloned());
    state.selected = still_selected.or_else(|| catalog.default_selection().cloned());
    state.catalog = catalog;

    vec![create_message(
        format!("Switched to backend: {name}"),
        MessageSender::System,
    )]
}

async fn handle_health_command(state: &mut ActorState) -> Vec<SessionMessage> {
    match state.synthesizer.health().await {
        Ok(()) => vec![create_message(
            format!("Backend '{}' is healthy", state.synthesizer.name()),
            MessageSender::System,
        )],
        Err(e) => vec![create_message(
            format!("Backend health check failed: {e}"),
            MessageSender::Error,
        )],
    }
}

fn handle_settings_command(state: &mut ActorState) -> Vec<SessionMessage> {
    let settings = state.settings.settings();
    match serde_json::to_string_pretty(&settings) {
        Ok(json) => vec![create_message(
            format!("Current settings:\n{json}"),
            MessageSender::System,
        )],
        Err(e) => vec![create_message(
            format!("Failed to serialize settings: {e}"),
            MessageSender::Error,
        )],
    }
}
