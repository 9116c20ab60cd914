use readaloud_core::session::events::{PlaybackStatus, VoiceCard};
use readaloud_core::session::playback::PlaybackState;

#[derive(Clone)]
pub struct Formatter {
    use_colors: bool,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn print_system(&self, msg: &str) {
        if self.use_colors {
            println!("\x1b[33m[System]\x1b[0m {msg}");
        } else {
            println!("[System] {msg}");
        }
    }

    pub fn print_warning(&self, msg: &str) {
        if self.use_colors {
            println!("\x1b[33m[Warning]\x1b[0m {msg}");
        } else {
            println!("[Warning] {msg}");
        }
    }

    pub fn print_error(&self, msg: &str) {
        if self.use_colors {
            eprintln!("\x1b[31m[Error]\x1b[0m {msg}");
        } else {
            eprintln!("[Error] {msg}");
        }
    }

    pub fn print_prompt(&self) -> String {
        if self.use_colors {
            "\x1b[35m>\x1b[0m ".to_string()
        } else {
            "> ".to_string()
        }
    }

    pub fn print_playback(&self, status: &PlaybackStatus) {
        let line = match status.state {
            PlaybackState::Idle => "⏹ Stopped".to_string(),
            PlaybackState::Loading => "⏳ Generating speech...".to_string(),
            PlaybackState::Playing => match status.duration {
                Some(duration) => {
                    format!("▶ Playing ({:.1}s of {:.1}s)", status.position, duration)
                }
                None => format!("▶ Playing ({:.1}s)", status.position),
            },
            PlaybackState::Paused => format!("⏸ Paused at {:.1}s", status.position),
        };

        if self.use_colors {
            println!("\x1b[32m{line}\x1b[0m");
        } else {
            println!("{line}");
        }
    }

    pub fn print_voices(&self, voices: &[VoiceCard], total: usize) {
        for card in voices {
            let marker = if card.selected { "*" } else { " " };
            let kind = if card.preset {
                format!("preset/{}", card.category.as_deref().unwrap_or("preset"))
            } else {
                card.gender.clone().unwrap_or_else(|| "-".to_string())
            };

            let line = format!(
                "{marker} {:<28} {:<24} {:<10} {:<9} {kind}",
                card.id, card.friendly_name, card.region, card.language
            );
            if self.use_colors && card.selected {
                println!("\x1b[1;32m{line}\x1b[0m");
            } else {
                println!("{line}");
            }
        }
        println!("  {} of {total} voices shown", voices.len());
    }
}
