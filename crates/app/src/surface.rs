use std::path::PathBuf;

use parallax_distorter_core::{DisplaySurface, Pixmap, Result};

/// Writes every `every`-th presented frame as `frame_NNNNN.png`.
#[derive(Debug)]
pub struct PngSequence {
    dir: PathBuf,
    every: u64,
    presented: u64,
    written: u64,
}

impl PngSequence {
    pub fn create(dir: impl Into<PathBuf>, every: u64) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        tracing::info!(dir = %dir.display(), every, "writing frames as PNG");
        Ok(Self {
            dir,
            every: every.max(1),
            presented: 0,
            written: 0,
        })
    }
}

impl DisplaySurface for PngSequence {
    fn present(&mut self, frame: &Pixmap) -> Result<()> {
        let index = self.presented;
        self.presented += 1;
        if index % self.every != 0 {
            return Ok(());
        }

        let path = self.dir.join(format!("frame_{index:05}.png"));
        frame.to_image().save(&path)?;
        self.written += 1;
        tracing::trace!(path = %path.display(), written = self.written, "frame written");
        Ok(())
    }
}
