//! Software rendering: an RGBA surface type plus the scanline compositor,
//! sprites, the CRT pass and presentation.

pub mod compositor;
pub mod crt;
pub mod present;
pub mod sprites;

use image::RgbaImage;

use crate::{DemoError, Result};

/// Logical frame width.
pub const SCREEN_WIDTH: u32 = 416;
/// Logical frame height.
pub const SCREEN_HEIGHT: u32 = 276;
/// Integer upscale applied when presenting.
pub const ZOOM: u32 = 2;

pub type Rgba = [u8; 4];

pub const TRANSPARENT: Rgba = [0, 0, 0, 0];
pub const BLACK: Rgba = [0, 0, 0, 255];

/// RGBA8 pixel buffer, row-major, no padding.
#[derive(Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Pixmap {
    /// Creates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let mut pixmap = Self::new(width, height);
        pixmap.fill(color);
        pixmap
    }

    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(DemoError::InvalidInput(
                "pixel buffer does not match the surface dimensions",
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = self.offset(x, y);
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[at..at + 4]);
        Some(rgba)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.width && y < self.height {
            let at = self.offset(x, y);
            self.pixels[at..at + 4].copy_from_slice(&color);
        }
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    /// Mutable rows, top to bottom.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        let stride = self.stride().max(4);
        self.pixels.chunks_exact_mut(stride)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn fill(&mut self, color: Rgba) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    /// Overwrites a clipped rectangle with `color`.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgba) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y..y_end {
            for column in x..x_end {
                self.set_pixel(column, row, color);
            }
        }
    }

    /// Blends `color` over the whole surface.
    pub fn overlay(&mut self, color: Rgba) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            blend_over(pixel, color);
        }
    }

    /// Blends the `width` x `height` block of `src` at `(src_x, src_y)` over
    /// this surface at `(dst_x, dst_y)`. Both rectangles are clipped.
    #[allow(clippy::too_many_arguments)]
    pub fn blit(
        &mut self,
        src: &Pixmap,
        src_x: i32,
        src_y: i32,
        width: u32,
        height: u32,
        dst_x: i32,
        dst_y: i32,
    ) {
        for dy in 0..height as i32 {
            let (sy, ty) = (src_y + dy, dst_y + dy);
            if !src.contains_row(sy) || !self.contains_row(ty) {
                continue;
            }

            let mut sx = src_x;
            let mut tx = dst_x;
            let mut run = width as i32;
            // Clip the left edge against both surfaces.
            let skip = (-sx).max(-tx).max(0);
            sx += skip;
            tx += skip;
            run -= skip;
            run = run
                .min(src.width as i32 - sx)
                .min(self.width as i32 - tx);
            if run <= 0 {
                continue;
            }

            let from = src.offset(sx as u32, sy as u32);
            let to = self.offset(tx as u32, ty as u32);
            let len = run as usize * 4;
            blend_span(&mut self.pixels[to..to + len], &src.pixels[from..from + len]);
        }
    }

    /// Draws `src` scaled by `scale` with its top-left corner at
    /// `(dst_x, dst_y)`, nearest-neighbour sampled, at `opacity` in `[0, 1]`.
    pub fn draw_scaled(&mut self, src: &Pixmap, dst_x: f64, dst_y: f64, scale: f64, opacity: f64) {
        if scale <= 0.0 || src.width == 0 || src.height == 0 {
            return;
        }
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u16;
        let x0 = dst_x.floor().max(0.0) as u32;
        let y0 = dst_y.floor().max(0.0) as u32;
        let x1 = (dst_x + src.width as f64 * scale).ceil().min(self.width as f64);
        let y1 = (dst_y + src.height as f64 * scale).ceil().min(self.height as f64);
        if x1 <= 0.0 || y1 <= 0.0 {
            return;
        }

        for ty in y0..y1 as u32 {
            let sy = ((ty as f64 + 0.5 - dst_y) / scale).floor();
            if sy < 0.0 || sy >= src.height as f64 {
                continue;
            }
            for tx in x0..x1 as u32 {
                let sx = ((tx as f64 + 0.5 - dst_x) / scale).floor();
                if sx < 0.0 || sx >= src.width as f64 {
                    continue;
                }
                let at = src.offset(sx as u32, sy as u32);
                let mut color = [0; 4];
                color.copy_from_slice(&src.pixels[at..at + 4]);
                color[3] = ((color[3] as u16 * alpha + 127) / 255) as u8;
                let to = self.offset(tx, ty);
                blend_over(&mut self.pixels[to..to + 4], color);
            }
        }
    }

    /// Returns a copy enlarged by an integer factor.
    pub fn upscale(&self, factor: u32) -> Pixmap {
        let factor = factor.max(1);
        let mut out = Pixmap::new(self.width * factor, self.height * factor);
        let stride = out.stride();
        for (ty, row) in out.pixels.chunks_exact_mut(stride.max(4)).enumerate() {
            let source = self.row(ty as u32 / factor);
            for (tx, pixel) in row.chunks_exact_mut(4).enumerate() {
                let at = tx / factor as usize * 4;
                pixel.copy_from_slice(&source[at..at + 4]);
            }
        }
        out
    }

    fn stride(&self) -> usize {
        self.width as usize * 4
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn contains_row(&self, y: i32) -> bool {
        y >= 0 && (y as u32) < self.height
    }
}

impl std::fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Source-over blend of a run of pixels. Fully transparent source pixels
/// leave the destination untouched.
pub fn blend_span(dst: &mut [u8], src: &[u8]) {
    for (to, from) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        blend_over(to, [from[0], from[1], from[2], from[3]]);
    }
}

fn blend_over(dst: &mut [u8], src: Rgba) {
    let alpha = src[3] as u32;
    match alpha {
        0 => {}
        255 => dst.copy_from_slice(&src),
        _ => {
            let inverse = 255 - alpha;
            for channel in 0..3 {
                dst[channel] =
                    ((src[channel] as u32 * alpha + dst[channel] as u32 * inverse + 127) / 255) as u8;
            }
            dst[3] = (alpha + (dst[3] as u32 * inverse + 127) / 255) as u8;
        }
    }
}
