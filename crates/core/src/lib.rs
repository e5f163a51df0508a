//! Core library of the parallax distorter demo.
//!
//! Everything the demo shows is derived from precomputed integer tables: wave
//! curves turned into cumulative displacement tables, a glyph position table
//! for the scroller text, and a cursor that maps pixel offsets back onto
//! banner characters. The [`Demo`] context ties them together with the
//! scanline compositor and the presentation pass; windowing and audio output
//! stay behind the [`DisplaySurface`] and [`AudioSink`] seams.

pub mod assets;
pub mod audio;
pub mod config;
pub mod cursor;
pub mod demo;
pub mod error;
pub mod render;
pub mod text;
pub mod timeline;
pub mod wave;

pub use assets::{AssetProvider, DemoAssets, DirectoryAssets};
pub use audio::{start_music, AudioSink, LoopingPlayer, PcmStream, SilentSink};
pub use config::DemoConfig;
pub use cursor::ScrollCursor;
pub use demo::Demo;
pub use error::{DemoError, Result};
pub use render::{
    compositor::{FrameCompositor, FrameState},
    present::{DisplaySurface, NullSurface, Presenter},
    Pixmap,
};
pub use text::{Banner, GlyphMetrics, PositionTable};
pub use timeline::{FixedStep, Phase, Transition};
pub use wave::{WaveKind, WaveTables};
