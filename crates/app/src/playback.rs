use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parallax_distorter_core::{DemoError, LoopingPlayer, Result};

/// Opens the default output device and feeds it from `player`.
///
/// The stream runs at the loaded track's own rate and channel count. Keep the
/// returned handle alive for as long as the music should play.
pub fn open_output(player: &LoopingPlayer) -> Result<cpal::Stream> {
    let (sample_rate, channels) = player
        .format()
        .ok_or_else(|| DemoError::msg("no music loaded"))?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| DemoError::msg("no audio output device found"))?;
    tracing::info!(
        device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
        sample_rate,
        channels,
        "opening audio output"
    );

    let config = cpal::StreamConfig {
        channels,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let source = player.clone();
    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if source.fill(data).is_err() {
                    data.fill(0.0);
                }
            },
            |err| tracing::error!(error = %err, "audio stream error"),
            None,
        )
        .map_err(|err| DemoError::msg(format!("failed to build audio stream: {err}")))?;

    stream
        .play()
        .map_err(|err| DemoError::msg(format!("failed to start audio stream: {err}")))?;
    Ok(stream)
}
