use anyhow::Result;

/// The single audio output handle. Exclusively owned by the playback
/// session; every mutation of the live audio resource goes through it.
///
/// Implementations are not required to be `Send`: the session actor runs
/// on a `LocalSet`, and the device output holds a platform stream that
/// must stay on its thread.
pub trait AudioOutput {
    /// Attach a new audio resource, replacing whatever was live. The
    /// resource starts paused at position zero.
    fn load(&mut self, bytes: Vec<u8>) -> Result<()>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Detach the live resource and reset position to zero.
    fn stop(&mut self);

    fn seek(&mut self, seconds: f64) -> Result<()>;

    /// Playback position in seconds.
    fn position(&self) -> f64;

    /// Duration of the live resource, if known.
    fn duration(&self) -> Option<f64>;

    /// True once the live resource has played to the end.
    fn is_finished(&self) -> bool;
}
