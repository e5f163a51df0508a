use super::{
    crt::CrtEffect,
    sprites::{draw_sprite, Sprite},
    Pixmap, SCREEN_HEIGHT, SCREEN_WIDTH, ZOOM,
};
use crate::{timeline::Phase, DemoConfig, Result};

/// Final destination of presented frames (a window, a video encoder, a PNG
/// sequence, ...).
pub trait DisplaySurface {
    fn present(&mut self, frame: &Pixmap) -> Result<()>;
}

/// Surface that discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl DisplaySurface for NullSurface {
    fn present(&mut self, _frame: &Pixmap) -> Result<()> {
        Ok(())
    }
}

/// Everything the presenter needs from one simulation tick.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub main: &'a Pixmap,
    pub phase: Phase,
    pub sprites: &'a [Sprite],
    pub logo: &'a Pixmap,
    /// Alpha of the black transition overlay, if one is active.
    pub fade: Option<u8>,
}

/// Turns the logical frame into the zoomed output image.
#[derive(Debug, Clone)]
pub struct Presenter {
    zoom: u32,
    crt: Option<CrtEffect>,
    glow: bool,
}

impl Presenter {
    pub fn new(config: &DemoConfig) -> Self {
        let zoom = ZOOM;
        let crt = if config.enable_crt {
            match CrtEffect::new(SCREEN_WIDTH * zoom, SCREEN_HEIGHT * zoom) {
                Ok(effect) => Some(effect),
                Err(err) => {
                    tracing::warn!(error = %err, "CRT effect unavailable, rendering without it");
                    None
                }
            }
        } else {
            None
        };

        Self {
            zoom,
            crt,
            glow: config.enable_glow,
        }
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn crt_enabled(&self) -> bool {
        self.crt.is_some()
    }

    /// Upscales the frame, runs the CRT pass during the intro, draws the
    /// sprites during the demo and finally the transition fade.
    pub fn compose(&self, view: &FrameView<'_>) -> Pixmap {
        let scaled = view.main.upscale(self.zoom);
        let mut screen = match (&self.crt, view.phase) {
            (Some(crt), Phase::Intro) => crt.apply(&scaled),
            _ => scaled,
        };

        if view.phase == Phase::Demo {
            for sprite in view.sprites {
                draw_sprite(&mut screen, view.logo, sprite, self.zoom, self.glow);
            }
        }

        if let Some(alpha) = view.fade {
            screen.overlay([0, 0, 0, alpha]);
        }
        screen
    }

    /// Composes `view` and hands it to `surface`.
    pub fn present(&self, view: &FrameView<'_>, surface: &mut dyn DisplaySurface) -> Result<()> {
        let screen = self.compose(view);
        surface.present(&screen)
    }
}
