pub mod actor;
pub mod commands;
pub mod events;
pub mod playback;

pub use actor::{SessionActor, SessionActorMessage};
pub use commands::CommandInfo;
pub use events::{MessageSender, SessionEvent, SessionMessage, VoiceCard};
pub use playback::PlaybackState;
