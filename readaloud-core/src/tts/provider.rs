use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A voice entry as reported by the backend's listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteVoice {
    #[serde(rename = "ShortName")]
    pub short_name: String,

    #[serde(rename = "Gender")]
    pub gender: String,

    #[serde(rename = "Locale")]
    pub locale: String,

    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

/// A synthesis request with rate/pitch already in wire format (see
/// `tts::wire`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    pub rate: String,
    pub pitch: String,
}

/// The audio payload returned by a synthesizer.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl SynthesizedAudio {
    /// File extension for downloads, derived from the response content
    /// type. The backend serves mp3 so that is the default.
    pub fn file_extension(&self) -> &'static str {
        match self.content_type.as_deref() {
            Some("audio/wav") | Some("audio/x-wav") => "wav",
            Some("audio/ogg") => "ogg",
            _ => "mp3",
        }
    }
}

/// Trait for synthesis backends
#[async_trait]
pub trait Synthesizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// List the voices the backend can synthesize with
    async fn list_voices(&self) -> Result<Vec<RemoteVoice>>;

    /// Synthesize text to audio bytes
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio>;

    /// Probe whether the backend is reachable
    async fn health(&self) -> Result<()>;
}
