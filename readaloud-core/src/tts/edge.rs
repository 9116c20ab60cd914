//! HTTP client for the edge-tts bridge backend.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::provider::{RemoteVoice, SynthesisRequest, SynthesizedAudio, Synthesizer};

pub struct EdgeTts {
    base_url: String,
    client: Client,
}

impl EdgeTts {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[derive(Serialize)]
struct TtsBody<'a> {
    text: &'a str,
    voice: &'a str,
    rate: &'a str,
    pitch: &'a str,
}

#[async_trait]
impl Synthesizer for EdgeTts {
    fn name(&self) -> &'static str {
        "edge"
    }

    async fn list_voices(&self) -> Result<Vec<RemoteVoice>> {
        let response = self
            .client
            .get(self.url("/voices"))
            .send()
            .await
            .context("Failed to fetch voice list from backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Backend voice list error {status}: {body}");
        }

        let voices: Vec<RemoteVoice> = response
            .json()
            .await
            .context("Failed to parse voice list response")?;

        Ok(voices)
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio> {
        let body = TtsBody {
            text: &request.text,
            voice: &request.voice,
            rate: &request.rate,
            pitch: &request.pitch,
        };

        let response = self
            .client
            .post(self.url("/tts"))
            .json(&body)
            .send()
            .await
            .context("Failed to send synthesis request to backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Backend synthesis error {status}: {body}");
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let bytes = response
            .bytes()
            .await
            .context("Failed to read audio bytes")?
            .to_vec();

        Ok(SynthesizedAudio {
            bytes,
            content_type,
        })
    }

    async fn health(&self) -> Result<()> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .context("Failed to reach backend health endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!("Backend health check failed: {}", response.status());
        }

        Ok(())
    }
}
