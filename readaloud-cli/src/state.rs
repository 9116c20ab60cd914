use readaloud_core::session::playback::PlaybackState;

/// CLI-local display state, separate from the session actor's state.
pub struct State {
    /// Print periodic position updates while playing.
    pub show_progress: bool,
    /// Last playback state we printed, so steady ticks in the same state
    /// stay quiet unless progress display is on.
    pub last_playback_state: Option<PlaybackState>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            show_progress: false,
            last_playback_state: None,
        }
    }
}
