//! Playback on the default audio device via rodio.

use std::io::Cursor;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::output::AudioOutput;

pub struct DeviceOutput {
    // Must outlive the sink; dropping it kills playback.
    stream: OutputStream,
    sink: Sink,
    duration: Option<f64>,
    has_audio: bool,
}

impl DeviceOutput {
    pub fn open() -> Result<Self> {
        let stream = OutputStreamBuilder::open_default_stream()
            .context("Failed to open default audio output device")?;
        let sink = Sink::connect_new(stream.mixer());

        Ok(Self {
            stream,
            sink,
            duration: None,
            has_audio: false,
        })
    }
}

/// Compressed streams (mp3 in particular) often report no duration from
/// the decoder. Decode the whole buffer once and count samples to get the
/// real figure. Best effort: a stream that can't be decoded twice simply
/// has no duration.
fn probe_duration(bytes: &[u8]) -> Option<f64> {
    let source = Decoder::new(Cursor::new(bytes.to_vec())).ok()?;
    let sample_rate = source.sample_rate() as u64;
    let channels = source.channels() as u64;
    if sample_rate == 0 || channels == 0 {
        return None;
    }
    let samples = source.count() as u64;
    Some(samples as f64 / (sample_rate * channels) as f64)
}

impl AudioOutput for DeviceOutput {
    fn load(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.sink.stop();
        self.sink = Sink::connect_new(self.stream.mixer());

        let source =
            Decoder::new(Cursor::new(bytes.clone())).context("Failed to decode audio stream")?;

        self.duration = match source.total_duration() {
            Some(d) => Some(d.as_secs_f64()),
            None => probe_duration(&bytes),
        };

        self.sink.append(source);
        self.sink.pause();
        self.has_audio = true;
        Ok(())
    }

    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.stop();
        self.sink = Sink::connect_new(self.stream.mixer());
        self.has_audio = false;
        self.duration = None;
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.sink
            .try_seek(Duration::from_secs_f64(seconds))
            .map_err(|e| anyhow!("Seek failed: {e}"))
    }

    fn position(&self) -> f64 {
        self.sink.get_pos().as_secs_f64()
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.has_audio && self.sink.empty()
    }
}

#[cfg(test)]
mod tests {
    use super::probe_duration;

    fn silence_wav(seconds: f32, sample_rate: u32, channels: u16) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut bytes = Vec::new();
        {
            let mut writer =
                hound::WavWriter::new(std::io::Cursor::new(&mut bytes), spec).unwrap();
            let samples = (seconds * sample_rate as f32) as u32 * channels as u32;
            for _ in 0..samples {
                writer.write_sample(0i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes
    }

    #[test]
    fn probe_counts_samples_for_a_mono_wav() {
        let duration = probe_duration(&silence_wav(0.5, 16_000, 1)).unwrap();
        assert!((duration - 0.5).abs() < 0.01, "duration was {duration}");
    }

    #[test]
    fn probe_divides_by_channel_count() {
        let duration = probe_duration(&silence_wav(1.0, 44_100, 2)).unwrap();
        assert!((duration - 1.0).abs() < 0.01, "duration was {duration}");
    }

    #[test]
    fn probe_of_undecodable_bytes_is_none() {
        assert_eq!(probe_duration(b"not an audio stream"), None);
        assert_eq!(probe_duration(&[]), None);
    }
}
