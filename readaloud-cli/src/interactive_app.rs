use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use readaloud_core::session::events::{MessageSender, SessionEvent};
use readaloud_core::settings::manager::SettingsManager;
use readaloud_core::SessionActor;

use crate::commands::{handle_local_command, LocalCommandResult};
use crate::formatter::Formatter;
use crate::state::State;

pub struct InteractiveApp {
    actor: SessionActor,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
    formatter: Formatter,
    state: State,
}

impl InteractiveApp {
    pub async fn new(settings_path: Option<PathBuf>, backend: Option<String>) -> Result<Self> {
        let settings_manager = match settings_path {
            Some(path) => SettingsManager::from_path(path)?,
            None => SettingsManager::new()?,
        };

        let (actor, event_rx) = SessionActor::launch(settings_manager);

        if let Some(backend) = backend {
            actor.send_input(format!("/backend {backend}"))?;
        }

        let formatter = Formatter::new();
        formatter.print_system(
            "💡 Type text to set it, /play to speak it, /help for commands, /quit to exit",
        );

        Ok(Self {
            actor,
            event_rx,
            formatter,
            state: State::default(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        // We do this handshake at the start of each run so the startup
        // messages (catalog load, default voice) get printed
        self.actor.get_settings()?;
        self.wait_for_response().await?;

        loop {
            let line = match rl.readline(&self.formatter.print_prompt()) {
                Ok(line) => line,
                Err(err) => match err {
                    ReadlineError::Interrupted => {
                        continue;
                    }
                    _ => break,
                },
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            match handle_local_command(&mut self.state, input) {
                LocalCommandResult::Handled { msg } => {
                    self.formatter.print_system(&msg);
                    continue;
                }
                LocalCommandResult::Exit => break,
                LocalCommandResult::Unhandled => (),
            }

            rl.add_history_entry(&line)?;
            self.actor.send_input(input.to_string())?;
            self.wait_for_response().await?;
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Drain events until the session goes idle. A synthesis in flight
    /// keeps the session busy, so the spinner covers the whole wait.
    async fn wait_for_response(&mut self) -> Result<()> {
        use tokio::signal;

        let mut spinner: Option<ProgressBar> = None;

        loop {
            tokio::select! {
                recv = self.event_rx.recv() => {
                    match recv {
                        Some(SessionEvent::BusyChanged(true)) => {
                            if spinner.is_none() {
                                let bar = ProgressBar::new_spinner();
                                bar.set_style(
                                    ProgressStyle::with_template("{spinner} {msg}")
                                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                                );
                                bar.set_message("working");
                                bar.enable_steady_tick(Duration::from_millis(100));
                                spinner = Some(bar);
                            }
                        }
                        Some(SessionEvent::BusyChanged(false)) => {
                            if let Some(bar) = spinner.take() {
                                bar.finish_and_clear();
                            }
                            break;
                        }
                        Some(event) => {
                            if let Some(bar) = spinner.clone() {
                                bar.suspend(|| self.format_event(&event));
                            } else {
                                self.format_event(&event);
                            }
                        }
                        None => {
                            break;
                        }
                    }
                }
                _ = signal::ctrl_c() => {
                    self.actor.send_input("/stop".to_string())?;
                    continue;
                }
            }
        }

        Ok(())
    }

    fn format_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::MessageAdded(message) => match message.sender {
                MessageSender::System => self.formatter.print_system(&message.content),
                MessageSender::Warning => self.formatter.print_warning(&message.content),
                MessageSender::Error => self.formatter.print_error(&message.content),
                MessageSender::User => {}
            },
            SessionEvent::Alert { message } => self.formatter.print_error(message),
            SessionEvent::PlaybackChanged(status) => {
                // By default only transitions are shown; /progress turns
                // on the repeated status lines too
                let changed = self.state.last_playback_state != Some(status.state);
                self.state.last_playback_state = Some(status.state);
                if changed || self.state.show_progress {
                    self.formatter.print_playback(status);
                }
            }
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
            // Raw settings payloads back the /settings command's text
            // output; nothing extra to render here
            SessionEvent::Settings(_) => {}
            SessionEvent::BusyChanged(_) => {}
        }
    }
}
