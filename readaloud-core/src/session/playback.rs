use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::AudioOutput;
use crate::session::events::PlaybackStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Loading,
    Playing,
    Paused,
}

/// The playback controller: owns the single audio output handle and the
/// one live audio resource. At most one resource is live at a time;
/// attaching a new one replaces the previous.
///
/// States move Idle -> Loading -> Playing/Paused -> Idle (on stop or
/// ended). Stopping keeps the resource cached so play-after-stop replays
/// from zero without a fresh synthesis; `invalidate` drops it, which is
/// what every text/voice/rate/pitch change does.
pub struct PlaybackSession {
    output: Box<dyn AudioOutput>,
    state: PlaybackState,
    audio: Option<Vec<u8>>,
}

impl PlaybackSession {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            state: PlaybackState::Idle,
            audio: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == PlaybackState::Loading
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    pub fn begin_loading(&mut self) {
        debug!("playback: loading");
        self.state = PlaybackState::Loading;
    }

    /// Abandon an in-flight load (failed or superseded synthesis).
    pub fn cancel_loading(&mut self) {
        if self.state == PlaybackState::Loading {
            self.state = PlaybackState::Idle;
        }
    }

    /// Attach freshly synthesized audio and start playing it.
    pub fn attach_and_play(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.output.load(bytes.clone())?;
        self.output.play();
        self.audio = Some(bytes);
        self.state = PlaybackState::Playing;
        debug!(duration = ?self.output.duration(), "playback: playing");
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.output.pause();
            self.state = PlaybackState::Paused;
        }
    }

    /// Resume a paused resource, or replay the cached one from zero after
    /// a stop. Returns false when there is nothing to resume - the caller
    /// needs a fresh synthesis.
    pub fn resume(&mut self) -> Result<bool> {
        match self.state {
            PlaybackState::Paused => {
                self.output.play();
                self.state = PlaybackState::Playing;
                Ok(true)
            }
            PlaybackState::Idle => match self.audio.clone() {
                Some(bytes) => {
                    self.output.load(bytes)?;
                    self.output.play();
                    self.state = PlaybackState::Playing;
                    Ok(true)
                }
                None => Ok(false),
            },
            PlaybackState::Loading | PlaybackState::Playing => Ok(false),
        }
    }

    /// Pause and reset position to zero. The cached resource survives.
    pub fn stop(&mut self) {
        self.output.stop();
        if self.state != PlaybackState::Loading {
            self.state = PlaybackState::Idle;
        }
    }

    /// Drop the live resource entirely. Invoked on every parameter change
    /// so stale audio can never play after an edit.
    pub fn invalidate(&mut self) {
        self.output.stop();
        self.audio = None;
        self.state = PlaybackState::Idle;
    }

    /// Seek is only meaningful once a finite duration is known; anything
    /// else is ignored (the slider is inert until metadata arrives).
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        let Some(duration) = self.output.duration() else {
            return Ok(());
        };
        if !duration.is_finite() {
            return Ok(());
        }
        self.output.seek(seconds.clamp(0.0, duration))
    }

    pub fn position(&self) -> f64 {
        self.output.position()
    }

    pub fn duration(&self) -> Option<f64> {
        self.output.duration()
    }

    /// Drive ended-detection. Returns true when the live resource just
    /// played to the end; position resets to zero.
    pub fn tick(&mut self) -> bool {
        if self.state == PlaybackState::Playing && self.output.is_finished() {
            self.output.stop();
            self.state = PlaybackState::Idle;
            debug!("playback: ended");
            return true;
        }
        false
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.state,
            position: self.position(),
            duration: self.duration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::mock::MockOutput;
    use crate::tts::mock::silence_wav;

    fn session() -> (PlaybackSession, MockOutput) {
        let output = MockOutput::new();
        (PlaybackSession::new(Box::new(output.clone())), output)
    }

    #[test]
    fn attach_play_pause_resume() {
        let (mut session, output) = session();
        assert_eq!(session.state(), PlaybackState::Idle);

        session.begin_loading();
        assert!(session.is_loading());

        session.attach_and_play(silence_wav()).unwrap();
        assert!(session.is_playing());
        assert!(output.handle().lock().unwrap().playing);

        session.pause();
        assert_eq!(session.state(), PlaybackState::Paused);

        assert!(session.resume().unwrap());
        assert!(session.is_playing());
    }

    #[test]
    fn stop_keeps_resource_for_replay() {
        let (mut session, output) = session();
        session.attach_and_play(silence_wav()).unwrap();
        session.stop();
        assert_eq!(session.state(), PlaybackState::Idle);
        assert!(session.has_audio());

        assert!(session.resume().unwrap());
        assert!(session.is_playing());
        // The cached bytes were re-attached, not re-synthesized
        assert_eq!(output.handle().lock().unwrap().loaded.len(), 2);
    }

    #[test]
    fn invalidate_drops_resource() {
        let (mut session, _) = session();
        session.attach_and_play(silence_wav()).unwrap();
        session.invalidate();
        assert!(!session.has_audio());
        assert!(!session.resume().unwrap());
    }

    #[test]
    fn seek_requires_finite_duration() {
        let (mut session, output) = session();
        output.set_next_duration(Some(f64::INFINITY));
        session.attach_and_play(silence_wav()).unwrap();
        session.seek(1.5).unwrap();
        assert!(output.handle().lock().unwrap().seeks.is_empty());

        output.set_next_duration(Some(3.0));
        session.attach_and_play(silence_wav()).unwrap();
        session.seek(1.5).unwrap();
        session.seek(99.0).unwrap();
        assert_eq!(output.handle().lock().unwrap().seeks, vec![1.5, 3.0]);
    }

    #[test]
    fn tick_detects_ended() {
        let (mut session, output) = session();
        session.attach_and_play(silence_wav()).unwrap();
        assert!(!session.tick());

        output.finish();
        assert!(session.tick());
        assert_eq!(session.state(), PlaybackState::Idle);
        assert_eq!(session.position(), 0.0);
    }
}
