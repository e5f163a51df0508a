use super::{Pixmap, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Edge length of the logo sprite.
pub const SPRITE_SIZE: u32 = 32;
/// Sprite counter increment per demo tick.
pub const SPRITE_SPEED: f64 = 0.02;

const GLOW_LAYERS: u32 = 3;

/// One logo sprite, positioned at its centre in logical screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub x: f64,
    pub y: f64,
    pub index: usize,
}

/// Closed-form orbit of sprite `index` at animation time `counter`, clamped
/// so the whole sprite stays on screen.
pub fn trajectory(index: usize, counter: f64) -> (f64, f64) {
    let i = index as f64;
    let c = counter + i * 0.155;
    let centre_x = SCREEN_WIDTH as f64 / 2.0;
    let centre_y = SCREEN_HEIGHT as f64 / 2.0;

    let x = centre_x
        + 100.0 * (c * 1.35 + 1.25).sin()
        + 100.0 * (c * 1.86 + 0.54).sin()
        + 20.0 * (i * 0.289 + 1.15).sin();
    let y = centre_y
        + 60.0 * (c * 1.72 + 0.23).cos()
        + 60.0 * (c * 1.63 + 0.98).cos()
        + 20.0 * (i * 0.456 + 0.85).cos();

    let half = SPRITE_SIZE as f64 / 2.0;
    (
        x.clamp(half, SCREEN_WIDTH as f64 - half),
        y.clamp(half, SCREEN_HEIGHT as f64 - half),
    )
}

/// Positions of `count` sprites at `counter`.
pub fn layout(count: usize, counter: f64) -> Vec<Sprite> {
    (0..count)
        .map(|index| {
            let (x, y) = trajectory(index, counter);
            Sprite { x, y, index }
        })
        .collect()
}

/// Draws a sprite onto a surface already enlarged by `zoom`, optionally
/// preceded by fading, slightly larger glow copies.
pub fn draw_sprite(screen: &mut Pixmap, logo: &Pixmap, sprite: &Sprite, zoom: u32, glow: bool) {
    let zoom = zoom as f64;
    let half = SPRITE_SIZE as f64 / 2.0;
    let (cx, cy) = (sprite.x * zoom, sprite.y * zoom);

    if glow {
        for layer in (1..=GLOW_LAYERS).rev() {
            let scale = zoom + layer as f64 * 0.1;
            screen.draw_scaled(
                logo,
                cx - half * scale,
                cy - half * scale,
                scale,
                0.3 / layer as f64,
            );
        }
    }

    screen.draw_scaled(logo, cx - half * zoom, cy - half * zoom, zoom, 1.0);
}
