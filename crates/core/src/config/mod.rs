use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

const DEFAULT_MUSIC_VOLUME: f64 = 0.7;
const DEFAULT_SPRITE_COUNT: i64 = 10;
const DEFAULT_DISTORTION_RATE: f64 = 1.0;

/// Accepted `spriteCount` values.
pub const SPRITE_COUNT_RANGE: RangeInclusive<i64> = 1..=1_000;
/// Accepted `distortionRate` values. The floor keeps the longest curve at
/// 400k samples.
pub const DISTORTION_RATE_RANGE: RangeInclusive<f64> = 0.01..=100.0;

/// User-facing configuration read from `config.json`.
///
/// Unknown keys are ignored and missing keys take their default. Values that
/// parse but fall outside their documented range are replaced by
/// [`DemoConfig::sanitize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DemoConfig {
    pub fullscreen: bool,
    pub vsync: bool,
    /// Music volume in `[0, 1]`.
    pub music_volume: f64,
    /// Number of orbiting logo sprites, see [`SPRITE_COUNT_RANGE`].
    pub sprite_count: i64,
    /// Multiplier applied to every curve's angular step, see [`DISTORTION_RATE_RANGE`].
    pub distortion_rate: f64,
    #[serde(rename = "enableCRT")]
    pub enable_crt: bool,
    pub enable_glow: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            fullscreen: false,
            vsync: true,
            music_volume: DEFAULT_MUSIC_VOLUME,
            sprite_count: DEFAULT_SPRITE_COUNT,
            distortion_rate: DEFAULT_DISTORTION_RATE,
            enable_crt: true,
            enable_glow: true,
        }
    }
}

impl DemoConfig {
    /// Loads the configuration at `path`, falling back to defaults whenever
    /// the file is missing or malformed. Never fails.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "no config file, using defaults");
                return Self::default();
            }
        };

        match Self::from_json_str(&text) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "malformed config, using defaults");
                Self::default()
            }
        }
    }

    /// Parses a JSON document and sanitizes the result.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config.sanitize())
    }

    /// Replaces every out-of-range value with its default.
    pub fn sanitize(mut self) -> Self {
        if !SPRITE_COUNT_RANGE.contains(&self.sprite_count) {
            tracing::warn!(value = self.sprite_count, "spriteCount out of range");
            self.sprite_count = DEFAULT_SPRITE_COUNT;
        }
        if !DISTORTION_RATE_RANGE.contains(&self.distortion_rate) {
            tracing::warn!(value = self.distortion_rate, "distortionRate out of range");
            self.distortion_rate = DEFAULT_DISTORTION_RATE;
        }
        if !(0.0..=1.0).contains(&self.music_volume) {
            tracing::warn!(value = self.music_volume, "musicVolume out of range");
            self.music_volume = DEFAULT_MUSIC_VOLUME;
        }
        self
    }

    /// Sprite count as an index-friendly value.
    pub fn sprites(&self) -> usize {
        usize::try_from(self.sprite_count).unwrap_or(DEFAULT_SPRITE_COUNT as usize)
    }
}
