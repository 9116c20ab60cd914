use readaloud_core::audio::device::DeviceOutput;
use readaloud_core::audio::AudioOutput;

fn sine_wav(seconds: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    {
        let mut writer =
            hound::WavWriter::new(std::io::Cursor::new(&mut bytes), spec).unwrap();
        let samples = (seconds * spec.sample_rate as f32) as u32;
        for t in 0..samples {
            let phase = t as f32 / spec.sample_rate as f32 * 440.0 * std::f32::consts::TAU;
            writer
                .write_sample((phase.sin() * i16::MAX as f32 * 0.2) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    bytes
}

// Needs a real audio device, so it does not run in CI. Run locally with
// `cargo test -- --ignored` to check the rodio wiring.
#[test]
#[ignore]
fn device_output_plays_a_generated_tone() {
    let mut output = DeviceOutput::open().expect("No default audio device");

    output.load(sine_wav(0.5)).unwrap();
    assert_eq!(output.position(), 0.0);
    let duration = output.duration().expect("WAV duration should be known");
    assert!((duration - 0.5).abs() < 0.05, "duration was {duration}");

    output.play();
    std::thread::sleep(std::time::Duration::from_millis(700));
    assert!(output.is_finished());

    output.stop();
    assert_eq!(output.duration(), None);
}

#[test]
#[ignore]
fn device_output_seeks_within_the_track() {
    let mut output = DeviceOutput::open().expect("No default audio device");
    output.load(sine_wav(2.0)).unwrap();

    output.seek(1.0).unwrap();
    output.play();
    std::thread::sleep(std::time::Duration::from_millis(100));
    assert!(output.position() >= 1.0);
    output.pause();
}
