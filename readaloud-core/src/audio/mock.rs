use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use super::output::AudioOutput;

/// Observable state of the mock output. Tests hold the shared handle and
/// assert against it after driving the session.
#[derive(Debug, Default)]
pub struct MockAudioState {
    /// Byte length of every resource attached, in order.
    pub loaded: Vec<usize>,
    pub playing: bool,
    pub position: f64,
    pub duration: Option<f64>,
    pub finished: bool,
    pub seeks: Vec<f64>,
    pub stops: usize,
    /// Duration to report for the next load. `None` means use the default.
    pub next_duration: Option<Option<f64>>,
}

#[derive(Clone, Default)]
pub struct MockOutput {
    state: Arc<Mutex<MockAudioState>>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Arc<Mutex<MockAudioState>> {
        self.state.clone()
    }

    /// Script the duration reported by the next `load`.
    pub fn set_next_duration(&self, duration: Option<f64>) {
        self.state.lock().unwrap().next_duration = Some(duration);
    }

    /// Mark the live resource as played to the end.
    pub fn finish(&self) {
        let mut state = self.state.lock().unwrap();
        state.finished = true;
        state.playing = false;
    }
}

impl AudioOutput for MockOutput {
    fn load(&mut self, bytes: Vec<u8>) -> Result<()> {
        if bytes.is_empty() {
            bail!("Failed to decode audio stream");
        }
        let mut state = self.state.lock().unwrap();
        state.loaded.push(bytes.len());
        state.playing = false;
        state.position = 0.0;
        state.finished = false;
        state.duration = state.next_duration.take().unwrap_or(Some(3.0));
        Ok(())
    }

    fn play(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.playing = true;
        state.finished = false;
    }

    fn pause(&mut self) {
        self.state.lock().unwrap().playing = false;
    }

    fn stop(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.playing = false;
        state.position = 0.0;
        state.duration = None;
        state.finished = false;
        state.stops += 1;
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.seeks.push(seconds);
        state.position = seconds;
        Ok(())
    }

    fn position(&self) -> f64 {
        self.state.lock().unwrap().position
    }

    fn duration(&self) -> Option<f64> {
        self.state.lock().unwrap().duration
    }

    fn is_finished(&self) -> bool {
        self.state.lock().unwrap().finished
    }
}
