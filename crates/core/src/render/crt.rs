use super::{Pixmap, BLACK};
use crate::{DemoError, Result};

const BARREL: f64 = 0.15;
const SCANLINE_FREQUENCY: f64 = 800.0;
const SCANLINE_DEPTH: f64 = 0.04;
const CHANNEL_SHIFT: f64 = 0.002;
const VIGNETTE: f64 = 0.5;

/// Full-screen CRT look: barrel distortion, scanlines, red/blue channel
/// shift and vignette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrtEffect {
    width: u32,
    height: u32,
}

impl CrtEffect {
    /// Prepares the effect for frames of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DemoError::InvalidInput("CRT effect needs a non-empty target"));
        }
        Ok(Self { width, height })
    }

    pub fn apply(&self, src: &Pixmap) -> Pixmap {
        let mut out = Pixmap::new(self.width, self.height);
        let (w, h) = (self.width as f64, self.height as f64);

        for y in 0..self.height {
            for x in 0..self.width {
                let u = (x as f64 + 0.5) / w - 0.5;
                let v = (y as f64 + 0.5) / h - 0.5;
                let bend = 1.0 + (u * u + v * v) * BARREL;
                let (du, dv) = (u * bend, v * bend);
                let (su, sv) = (du + 0.5, dv + 0.5);

                if !(0.0..=1.0).contains(&su) || !(0.0..=1.0).contains(&sv) {
                    out.set_pixel(x, y, BLACK);
                    continue;
                }

                let base = sample(src, su, sv);
                let scanline = (sv * SCANLINE_FREQUENCY).sin() * SCANLINE_DEPTH;
                let red = sample(src, su + CHANNEL_SHIFT, sv)[0];
                let blue = sample(src, su - CHANNEL_SHIFT, sv)[2];
                let green = base[1] - scanline;
                let vignette = 1.0 - (du * du + dv * dv) * VIGNETTE;

                out.set_pixel(
                    x,
                    y,
                    [
                        to_byte(red * vignette),
                        to_byte(green * vignette),
                        to_byte(blue * vignette),
                        to_byte(base[3]),
                    ],
                );
            }
        }
        out
    }
}

/// Nearest texel at normalised coordinates, clamped to the edge, as floats
/// in `[0, 1]`.
fn sample(src: &Pixmap, u: f64, v: f64) -> [f64; 4] {
    if src.width() == 0 || src.height() == 0 {
        return [0.0; 4];
    }
    let x = ((u * src.width() as f64) as i64).clamp(0, src.width() as i64 - 1) as u32;
    let y = ((v * src.height() as f64) as i64).clamp(0, src.height() as i64 - 1) as u32;
    let texel = src.pixel(x, y).unwrap_or_default();
    texel.map(|channel| channel as f64 / 255.0)
}

fn to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_targets() {
        assert!(CrtEffect::new(0, 10).is_err());
        assert!(CrtEffect::new(10, 10).is_ok());
    }

    #[test]
    fn darkens_edges_more_than_the_centre() {
        let src = Pixmap::filled(64, 64, [255, 255, 255, 255]);
        let crt = CrtEffect::new(64, 64).unwrap();
        let out = crt.apply(&src);

        let centre = out.pixel(32, 32).unwrap();
        let edge = out.pixel(1, 32).unwrap();
        assert!(centre[0] > edge[0]);
        assert_eq!(centre[3], 255);
    }

    #[test]
    fn barrel_pushes_corners_outside_the_image() {
        let src = Pixmap::filled(100, 100, [200, 200, 200, 255]);
        let out = CrtEffect::new(100, 100).unwrap().apply(&src);
        assert_eq!(out.pixel(0, 0), Some(BLACK));
        assert_ne!(out.pixel(50, 50), Some(BLACK));
    }

    #[test]
    fn shifts_red_and_blue_in_opposite_directions() {
        let mut src = Pixmap::filled(1000, 10, [0, 0, 0, 255]);
        src.fill_rect(501, 0, 1, 10, [255, 0, 255, 255]);
        let out = CrtEffect::new(1000, 10).unwrap().apply(&src);

        // Columns left of the stripe pick up red, right of it pick up blue.
        let left = out.pixel(499, 5).unwrap();
        let right = out.pixel(503, 5).unwrap();
        assert!(left[0] > 0 && left[2] == 0);
        assert!(right[2] > 0 && right[0] == 0);
    }
}
