pub mod edge;
pub mod mock;
pub mod provider;
pub mod wire;

pub use provider::{RemoteVoice, SynthesisRequest, SynthesizedAudio, Synthesizer};
