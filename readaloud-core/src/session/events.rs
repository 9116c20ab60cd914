use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use crate::session::playback::PlaybackState;
use crate::voice::locale::{friendly_name, language_name, region_label};
use crate::voice::types::Voice;

/// `SessionEvent` are the messages sent from the actor - the output of the
/// actor.
///
/// The actor is built with 2 channels - an input and output channel.
/// Requests are sent to the actor through the input channel and may
/// generate 1 or more `SessionEvent`s in response. Front ends (CLI/tests)
/// process session events to implement their rendering; the events derive
/// serde so a front end in another process could consume them as json.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum SessionEvent {
    MessageAdded(SessionMessage),

    /// The actor is processing input or waiting on a synthesis request.
    /// Front ends use this to delimit turns.
    BusyChanged(bool),

    /// A blocking, user-visible failure notice.
    Alert { message: String },

    PlaybackChanged(PlaybackStatus),

    CatalogLoaded { voices: usize, degraded: bool },

    VoiceList { voices: Vec<VoiceCard>, total: usize },

    Settings(serde_json::Value),

    Downloaded { path: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMessage {
    pub timestamp: u64,
    pub sender: MessageSender,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageSender {
    User,
    System,
    Warning,
    Error,
}

impl SessionMessage {
    fn new(sender: MessageSender, content: String) -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis() as u64,
            sender,
            content,
        }
    }

    pub fn user(content: String) -> Self {
        Self::new(MessageSender::User, content)
    }

    pub fn system(content: String) -> Self {
        Self::new(MessageSender::System, content)
    }

    pub fn warning(content: String) -> Self {
        Self::new(MessageSender::Warning, content)
    }

    pub fn error(content: String) -> Self {
        Self::new(MessageSender::Error, content)
    }
}

/// Snapshot of the playback controller for front ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub position: f64,
    pub duration: Option<f64>,
}

/// Gallery presentation data for one voice, computed in core so every
/// front end renders the same derivations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceCard {
    pub id: String,
    pub name: String,
    pub friendly_name: String,
    pub region: String,
    pub language: String,
    pub gender: Option<String>,
    pub category: Option<String>,
    pub preset: bool,
    pub selected: bool,
}

impl VoiceCard {
    pub fn from_voice(voice: &Voice, selected: bool) -> Self {
        Self {
            id: voice.id().to_string(),
            name: voice.name().to_string(),
            friendly_name: friendly_name(voice.name()),
            region: region_label(voice.lang()),
            language: language_name(voice.lang()),
            gender: voice.gender_tag().map(|g| g.to_string()),
            category: voice.category().map(|c| c.to_string()),
            preset: voice.is_preset(),
            selected,
        }
    }
}

/// A small wrapper over the `event_tx` for convenience. The busy flag is
/// deduplicated so idle ticks don't flood the channel.
#[derive(Clone)]
pub struct EventSender {
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_history: Arc<Mutex<Vec<SessionEvent>>>,
    busy: Arc<Mutex<bool>>,
}

impl EventSender {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (event_tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                event_tx,
                event_history: Arc::new(Mutex::new(Vec::new())),
                busy: Arc::new(Mutex::new(false)),
            },
            rx,
        )
    }

    pub fn send(&self, event: SessionEvent) {
        self.event_history.lock().unwrap().push(event.clone());
        let _ = self.event_tx.send(event);
    }

    pub fn add_message(&self, message: SessionMessage) {
        self.send(SessionEvent::MessageAdded(message));
    }

    pub fn alert(&self, message: String) {
        self.send(SessionEvent::Alert { message });
    }

    pub fn set_busy(&self, busy: bool) {
        let mut current = self.busy.lock().unwrap();
        if *current != busy {
            *current = busy;
            drop(current);
            self.send(SessionEvent::BusyChanged(busy));
        }
    }

    pub fn event_history(&self) -> Vec<SessionEvent> {
        self.event_history.lock().unwrap().clone()
    }
}
