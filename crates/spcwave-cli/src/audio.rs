use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use spcwave_core::SAMPLE_RATE;
use spcwave_core::audio_queue::SampleConsumer;

/// Start audio playback with `cpal`, draining the emulator's sample queue.
///
/// The device runs at whatever rate it prefers; a zero-order-hold
/// resampler steps through the 32 kHz frames at the matching ratio.
/// Returns the active [`cpal::Stream`] if an output device is available.
pub fn start_stream(consumer: SampleConsumer) -> Option<cpal::Stream> {
    let host = cpal::default_host();
    let device = host.default_output_device()?;
    let supported = match device.default_output_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("no supported output config: {e}");
            return None;
        }
    };
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let channels = config.channels as usize;
    let mut source = Resampler::new(consumer, config.sample_rate.0);
    let err_fn = |err| eprintln!("cpal stream error: {err}");

    let build = |stream: Result<cpal::Stream, cpal::BuildStreamError>| match stream {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("failed to build output stream: {e}");
            None
        }
    };

    let stream = match sample_format {
        cpal::SampleFormat::I16 => build(device.build_output_stream(
            &config,
            move |data: &mut [i16], _| {
                for frame in data.chunks_mut(channels) {
                    let (left, right) = source.next_frame();
                    frame[0] = left;
                    if channels > 1 {
                        frame[1] = right;
                    }
                }
            },
            err_fn,
            None,
        )),
        cpal::SampleFormat::F32 => build(device.build_output_stream(
            &config,
            move |data: &mut [f32], _| {
                for frame in data.chunks_mut(channels) {
                    let (left, right) = source.next_frame();
                    frame[0] = left as f32 / 32768.0;
                    if channels > 1 {
                        frame[1] = right as f32 / 32768.0;
                    }
                }
            },
            err_fn,
            None,
        )),
        other => {
            eprintln!("unsupported sample format: {other:?}");
            None
        }
    };

    if let Some(s) = &stream
        && let Err(e) = s.play()
    {
        eprintln!("failed to start stream: {e}");
        return None;
    }
    stream
}

/// Zero-order-hold resampler from the DSP's 32 kHz to the device rate.
struct Resampler {
    consumer: SampleConsumer,
    device_rate: u32,
    /// Fractional source position in units of 1/device_rate.
    phase: u32,
    held: (i16, i16),
}

impl Resampler {
    fn new(consumer: SampleConsumer, device_rate: u32) -> Self {
        Self {
            consumer,
            device_rate: device_rate.max(1),
            phase: 0,
            held: (0, 0),
        }
    }

    fn next_frame(&mut self) -> (i16, i16) {
        self.phase += SAMPLE_RATE;
        while self.phase >= self.device_rate {
            self.phase -= self.device_rate;
            // Hold the last frame on underrun rather than clicking to zero.
            if let Some(frame) = self.consumer.pop_frame() {
                self.held = frame;
            }
        }
        self.held
    }
}
