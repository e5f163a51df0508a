use std::path::{Path, PathBuf};

use crate::{audio::PcmStream, render::Pixmap, DemoError, Result};

pub const BACKGROUND_ASSET: &str = "back.png";
pub const FONT_ASSET: &str = "font.png";
pub const LOGO_ASSET: &str = "logo.png";
pub const MUSIC_ASSET: &str = "music.wav";

const BACKGROUND_PLACEHOLDER: (u32, u32, [u8; 4]) = (8, 64, [64, 32, 128, 255]);
const LOGO_PLACEHOLDER: (u32, u32, [u8; 4]) = (32, 32, [255, 255, 0, 255]);

/// Source of decoded images and audio streams.
pub trait AssetProvider {
    fn load_image(&self, name: &str) -> Result<Pixmap>;
    fn load_audio_stream(&self, name: &str) -> Result<PcmStream>;
}

/// Loads assets from files below a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetProvider for DirectoryAssets {
    fn load_image(&self, name: &str) -> Result<Pixmap> {
        let image = image::open(self.root.join(name))?;
        Ok(Pixmap::from_image(image.to_rgba8()))
    }

    fn load_audio_stream(&self, name: &str) -> Result<PcmStream> {
        let reader = hound::WavReader::open(self.root.join(name))?;
        PcmStream::from_wav(reader)
    }
}

/// Every asset the demo uses, decoded once before the frame loop starts.
#[derive(Debug, Clone)]
pub struct DemoAssets {
    pub background: Pixmap,
    pub font: Pixmap,
    pub logo: Pixmap,
    pub music: Option<PcmStream>,
}

impl DemoAssets {
    /// Loads the demo assets. Cosmetic images fall back to solid
    /// placeholders and missing music is tolerated; only the font is
    /// required.
    pub fn load(provider: &dyn AssetProvider) -> Result<Self> {
        let background = load_or_placeholder(provider, BACKGROUND_ASSET, BACKGROUND_PLACEHOLDER);
        let font = provider.load_image(FONT_ASSET).map_err(|err| {
            DemoError::msg(format!("glyph atlas `{FONT_ASSET}` is required: {err}"))
        })?;
        let logo = load_or_placeholder(provider, LOGO_ASSET, LOGO_PLACEHOLDER);

        let music = match provider.load_audio_stream(MUSIC_ASSET) {
            Ok(stream) => Some(stream),
            Err(err) => {
                tracing::warn!(asset = MUSIC_ASSET, error = %err, "music unavailable, running silent");
                None
            }
        };

        Ok(Self {
            background,
            font,
            logo,
            music,
        })
    }
}

fn load_or_placeholder(
    provider: &dyn AssetProvider,
    name: &str,
    (width, height, color): (u32, u32, [u8; 4]),
) -> Pixmap {
    match provider.load_image(name) {
        Ok(image) if image.width() > 0 && image.height() > 0 => image,
        Ok(_) => {
            tracing::warn!(asset = name, "empty image, using placeholder");
            Pixmap::filled(width, height, color)
        }
        Err(err) => {
            tracing::warn!(asset = name, error = %err, "using placeholder");
            Pixmap::filled(width, height, color)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct MemoryAssets {
        images: HashMap<&'static str, Pixmap>,
    }

    impl AssetProvider for MemoryAssets {
        fn load_image(&self, name: &str) -> Result<Pixmap> {
            self.images
                .get(name)
                .cloned()
                .ok_or_else(|| DemoError::msg(format!("no asset `{name}`")))
        }

        fn load_audio_stream(&self, name: &str) -> Result<PcmStream> {
            Err(DemoError::msg(format!("no asset `{name}`")))
        }
    }

    #[test]
    fn cosmetic_assets_fall_back_to_placeholders() {
        let mut provider = MemoryAssets::default();
        provider.images.insert(FONT_ASSET, Pixmap::new(480, 216));

        let assets = DemoAssets::load(&provider).unwrap();
        assert_eq!((assets.background.width(), assets.background.height()), (8, 64));
        assert_eq!(assets.background.pixel(3, 3), Some([64, 32, 128, 255]));
        assert_eq!(assets.logo.pixel(0, 0), Some([255, 255, 0, 255]));
        assert!(assets.music.is_none());
    }

    #[test]
    fn missing_font_is_fatal() {
        let mut provider = MemoryAssets::default();
        provider.images.insert(BACKGROUND_ASSET, Pixmap::new(8, 64));

        let err = DemoAssets::load(&provider).unwrap_err();
        assert!(format!("{err}").contains(FONT_ASSET));
    }

    #[test]
    fn reads_png_and_wav_from_a_directory() {
        let dir = tempfile::tempdir().unwrap();

        let mut font = image::RgbaImage::new(4, 2);
        font.put_pixel(1, 1, image::Rgba([1, 2, 3, 255]));
        font.save(dir.path().join(FONT_ASSET)).unwrap();

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(dir.path().join(MUSIC_ASSET), spec).unwrap();
        for sample in [0i16, i16::MAX, i16::MIN] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let assets = DemoAssets::load(&DirectoryAssets::new(dir.path())).unwrap();
        assert_eq!(assets.font.pixel(1, 1), Some([1, 2, 3, 255]));
        assert_eq!(assets.logo.width(), 32);

        let music = assets.music.expect("music should decode");
        assert_eq!(music.sample_rate, 8_000);
        assert_eq!(music.samples.len(), 3);
        assert!((music.samples[1] - 1.0).abs() < 1e-3);
        assert!((music.samples[2] + 1.0).abs() < 1e-3);
    }
}
