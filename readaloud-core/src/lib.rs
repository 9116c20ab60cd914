pub mod audio;
pub mod extract;
pub mod session;
pub mod settings;
pub mod tts;
pub mod voice;

// Public library API - front ends drive the session actor through these.
pub use session::{SessionActor, SessionActorMessage, SessionEvent, SessionMessage};
pub use settings::{Settings, SettingsManager};
pub use voice::{Catalog, Voice, VoiceFilter};
