//! Non-interactive mode: drive a full set-voice/set-text/speak-or-save
//! pass through the session actor and exit with a meaningful status.

use anyhow::{bail, Result};
use std::path::PathBuf;
use tokio::sync::mpsc;

use readaloud_core::session::events::{MessageSender, SessionEvent};
use readaloud_core::session::playback::PlaybackState;
use readaloud_core::settings::manager::SettingsManager;
use readaloud_core::SessionActor;

use crate::formatter::Formatter;

pub struct OneShotRequest {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    pub voice: Option<String>,
    pub rate: Option<f64>,
    pub pitch: Option<i32>,
    pub download: bool,
    pub out: Option<PathBuf>,
    pub backend: Option<String>,
}

pub async fn run(settings_path: Option<PathBuf>, request: OneShotRequest) -> Result<()> {
    let settings_manager = match settings_path {
        Some(path) => SettingsManager::from_path(path)?,
        None => SettingsManager::new()?,
    };

    let (actor, event_rx) = SessionActor::launch(settings_manager);
    let mut driver = Driver {
        actor,
        event_rx,
        formatter: Formatter::new(),
        last_playback: None,
        downloaded: None,
    };

    // Startup handshake: catalog load and default selection happen before
    // the settings reply comes back
    driver.actor.get_settings()?;
    driver.turn().await?;

    if let Some(backend) = &request.backend {
        driver.command(format!("/backend {backend}")).await?;
    }
    if let Some(voice) = &request.voice {
        driver.command(format!("/voice {voice}")).await?;
    }
    if let Some(rate) = request.rate {
        driver.command(format!("/rate {rate}")).await?;
    }
    if let Some(pitch) = request.pitch {
        driver.command(format!("/pitch {pitch}")).await?;
    }

    match (&request.text, &request.file) {
        (Some(text), _) => driver.command(text.clone()).await?,
        (None, Some(file)) => {
            driver.command(format!("/load {}", file.display())).await?
        }
        (None, None) => bail!("One-shot mode needs --text or --file"),
    }

    if request.download {
        let command = match &request.out {
            Some(dir) => format!("/download {}", dir.display()),
            None => "/download".to_string(),
        };
        driver.command(command).await?;
        if driver.downloaded.is_none() {
            bail!("Download did not produce a file");
        }
        return Ok(());
    }

    driver.command("/play").await?;
    if driver.last_playback != Some(PlaybackState::Playing) {
        bail!("Playback did not start");
    }
    driver.wait_for_playback_end().await?;
    Ok(())
}

struct Driver {
    actor: SessionActor,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
    formatter: Formatter,
    last_playback: Option<PlaybackState>,
    downloaded: Option<String>,
}

impl Driver {
    /// Send one input and drain the resulting turn. Any error message or
    /// alert fails the run: in one-shot mode there is nobody to retype.
    async fn command(&mut self, input: impl Into<String>) -> Result<()> {
        self.actor.send_input(input.into())?;
        self.turn().await
    }

    async fn turn(&mut self) -> Result<()> {
        let mut failure: Option<String> = None;

        while let Some(event) = self.event_rx.recv().await {
            match &event {
                SessionEvent::BusyChanged(false) => break,
                SessionEvent::Alert { message } => {
                    failure.get_or_insert_with(|| message.clone());
                }
                SessionEvent::MessageAdded(message)
                    if message.sender == MessageSender::Error =>
                {
                    failure.get_or_insert_with(|| message.content.clone());
                }
                SessionEvent::Downloaded { path } => {
                    self.downloaded = Some(path.clone());
                }
                SessionEvent::PlaybackChanged(status) => {
                    self.last_playback = Some(status.state);
                }
                _ => {}
            }
            self.print(&event);
        }

        match failure {
            Some(message) => bail!("{message}"),
            None => Ok(()),
        }
    }

    /// After a successful /play, keep the reactor turning until the
    /// periodic tick reports that the audio ran out.
    async fn wait_for_playback_end(&mut self) -> Result<()> {
        while let Some(event) = self.event_rx.recv().await {
            if let SessionEvent::PlaybackChanged(status) = &event {
                self.last_playback = Some(status.state);
                if status.state == PlaybackState::Idle {
                    self.print(&event);
                    return Ok(());
                }
            }
            self.print(&event);
        }
        bail!("Session ended before playback finished")
    }

    fn print(&self, event: &SessionEvent) {
        match event {
            SessionEvent::MessageAdded(message) => match message.sender {
                MessageSender::System => self.formatter.print_system(&message.content),
                MessageSender::Warning => self.formatter.print_warning(&message.content),
                MessageSender::Error => self.formatter.print_error(&message.content),
                MessageSender::User => {}
            },
            SessionEvent::Alert { message } => self.formatter.print_error(message),
            SessionEvent::PlaybackChanged(status) => self.formatter.print_playback(status),
            SessionEvent::CatalogLoaded { voices, degraded } => {
                self.formatter
                    .print_system(&format!("Voice catalog loaded: {voices} voices"));
                if *degraded {
                    self.formatter.print_warning(
                        "Voice list unavailable; only presets are offered. Is the backend running?",
                    );
                }
            }
            SessionEvent::VoiceList { voices, total } => {
                self.formatter.print_voices(voices, *total);
            }
            SessionEvent::Downloaded { path } => {
                self.formatter.print_system(&format!("Audio saved to {path}"));
            }
            SessionEvent::Settings(_) => {}
            SessionEvent::BusyChanged(_) => {}
        }
    }
}
