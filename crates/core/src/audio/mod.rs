use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{DemoError, Result};

/// Decoded, interleaved PCM audio.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmStream {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples in `[-1, 1]`.
    pub samples: Vec<f32>,
}

impl PcmStream {
    /// Decodes a whole WAV stream, normalising integer formats to `[-1, 1]`.
    pub fn from_wav<R: Read>(reader: hound::WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<std::result::Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|sample| sample.map(|value| value as f32 / scale))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        Ok(Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }
}

/// Playback device that loops a single stream.
pub trait AudioSink {
    fn play(&mut self, stream: PcmStream) -> Result<()>;
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
}

/// Sink used when no audio device or no music is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink {
    volume: f32,
}

impl AudioSink for SilentSink {
    fn play(&mut self, _stream: PcmStream) -> Result<()> {
        Ok(())
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
    }
}

#[derive(Debug, Default)]
struct PlayerState {
    stream: Option<PcmStream>,
    position: usize,
    volume: f32,
}

/// Looping PCM source shared between the demo and an audio callback.
///
/// Clones refer to the same playback state.
#[derive(Debug, Clone, Default)]
pub struct LoopingPlayer {
    shared: Arc<Mutex<PlayerState>>,
}

impl LoopingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills `out` with the next interleaved samples scaled by the volume,
    /// wrapping at the end of the stream. Silence when nothing is loaded.
    pub fn fill(&self, out: &mut [f32]) -> Result<()> {
        let mut state = self.lock()?;
        let volume = state.volume;
        let PlayerState {
            stream, position, ..
        } = &mut *state;

        match stream.as_ref().filter(|stream| !stream.samples.is_empty()) {
            Some(stream) => {
                let samples = &stream.samples;
                for slot in out.iter_mut() {
                    *slot = samples[*position] * volume;
                    *position = (*position + 1) % samples.len();
                }
            }
            None => out.fill(0.0),
        }
        Ok(())
    }

    /// Format of the loaded stream as `(sample_rate, channels)`.
    pub fn format(&self) -> Option<(u32, u16)> {
        let state = self.lock().ok()?;
        state
            .stream
            .as_ref()
            .map(|stream| (stream.sample_rate, stream.channels))
    }

    fn lock(&self) -> Result<MutexGuard<'_, PlayerState>> {
        self.shared
            .lock()
            .map_err(|_| DemoError::msg("audio player state has been poisoned"))
    }
}

impl AudioSink for LoopingPlayer {
    fn play(&mut self, stream: PcmStream) -> Result<()> {
        if stream.channels == 0 || stream.sample_rate == 0 {
            return Err(DemoError::InvalidInput("audio stream has no channels or rate"));
        }
        let mut state = self.lock()?;
        state.stream = Some(stream);
        state.position = 0;
        Ok(())
    }

    fn volume(&self) -> f32 {
        self.lock().map(|state| state.volume).unwrap_or(0.0)
    }

    fn set_volume(&mut self, volume: f32) {
        if let Ok(mut state) = self.lock() {
            state.volume = clamp_volume(volume);
        }
    }
}

/// Starts looping `music` on `sink`. Failures are logged and the demo simply
/// stays silent.
pub fn start_music(sink: &mut dyn AudioSink, music: Option<PcmStream>, volume: f64) -> bool {
    sink.set_volume(volume as f32);
    let Some(music) = music else {
        return false;
    };

    match sink.play(music) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "could not start music, continuing silently");
            false
        }
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
