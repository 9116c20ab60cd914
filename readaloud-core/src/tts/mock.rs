use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::provider::{RemoteVoice, SynthesisRequest, SynthesizedAudio, Synthesizer};

/// Mock behavior for the mock synthesizer
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MockBehavior {
    /// Return a small valid WAV payload
    #[default]
    Success,
    /// Fail synthesis as the backend would for a non-2xx response
    HttpError { status: u16 },
    /// Fail synthesis as a transport error would
    NetworkError,
    /// Fail the voice-list call (synthesis still succeeds)
    ListFailure,
    /// Sleep before answering synthesis and health calls successfully
    Delayed { millis: u64 },
    /// Enables multi-request tests by playing behaviors in order
    BehaviorQueue { behaviors: Vec<MockBehavior> },
}

/// Mock synthesizer for testing. Clones share internal state so a test can
/// keep a handle while the session owns another.
#[derive(Clone)]
pub struct MockSynthesizer {
    behavior: Arc<Mutex<MockBehavior>>,
    voices: Arc<Mutex<Vec<RemoteVoice>>>,
    captured_requests: Arc<Mutex<Vec<SynthesisRequest>>>,
}

fn default_voices() -> Vec<RemoteVoice> {
    let voice = |short_name: &str, gender: &str, locale: &str| RemoteVoice {
        short_name: short_name.to_string(),
        gender: gender.to_string(),
        locale: locale.to_string(),
        name: None,
    };

    vec![
        voice("en-US-AriaNeural", "Female", "en-US"),
        voice("en-US-GuyNeural", "Male", "en-US"),
        voice("en-GB-SoniaNeural", "Female", "en-GB"),
        voice("ja-JP-NanamiNeural", "Female", "ja-JP"),
    ]
}

/// A minimal valid WAV file: 100ms of silence at 16kHz mono. Kept valid so
/// the device output could decode it if a test is wired to real audio.
pub fn silence_wav() -> Vec<u8> {
    const SAMPLE_RATE: u32 = 16_000;
    const SAMPLES: u32 = SAMPLE_RATE / 10;
    let data_len = SAMPLES * 2;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    bytes.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);
    bytes
}

impl MockSynthesizer {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            voices: Arc::new(Mutex::new(default_voices())),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn pop_behavior_from_queue(behavior: &mut MockBehavior) -> MockBehavior {
        if let MockBehavior::BehaviorQueue { behaviors } = behavior {
            if behaviors.is_empty() {
                return MockBehavior::Success;
            }
            return behaviors.remove(0);
        }
        behavior.clone()
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn set_voices(&self, voices: Vec<RemoteVoice>) {
        *self.voices.lock().unwrap() = voices;
    }

    pub fn captured_requests(&self) -> Vec<SynthesisRequest> {
        self.captured_requests.lock().unwrap().clone()
    }

    pub fn last_captured_request(&self) -> Option<SynthesisRequest> {
        self.captured_requests.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_voices(&self) -> Result<Vec<RemoteVoice>> {
        let behavior = self.behavior.lock().unwrap().clone();
        if matches!(behavior, MockBehavior::ListFailure) {
            return Err(anyhow!("Mock voice list failure"));
        }
        Ok(self.voices.lock().unwrap().clone())
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio> {
        self.captured_requests.lock().unwrap().push(request);

        let effective = {
            let mut behavior = self.behavior.lock().unwrap();
            Self::pop_behavior_from_queue(&mut behavior)
        };

        match effective {
            MockBehavior::Success | MockBehavior::ListFailure => Ok(SynthesizedAudio {
                bytes: silence_wav(),
                content_type: Some("audio/wav".to_string()),
            }),
            MockBehavior::HttpError { status } => {
                Err(anyhow!("Backend synthesis error {status}: mock failure"))
            }
            MockBehavior::NetworkError => Err(anyhow!("Failed to send synthesis request to backend")),
            MockBehavior::Delayed { millis } => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                Ok(SynthesizedAudio {
                    bytes: silence_wav(),
                    content_type: Some("audio/wav".to_string()),
                })
            }
            MockBehavior::BehaviorQueue { .. } => {
                panic!("Bug: nested BehaviorQueue detected. Test setup error - BehaviorQueues cannot contain other BehaviorQueues")
            }
        }
    }

    async fn health(&self) -> Result<()> {
        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            MockBehavior::NetworkError => Err(anyhow!("Failed to reach backend health endpoint")),
            MockBehavior::Delayed { millis } => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
