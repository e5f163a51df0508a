use super::{blend_span, Pixmap, SCREEN_WIDTH};
use crate::wave::{WaveChannel, WaveTables};

/// Minimum extra width of the tiled background surface beyond the screen.
pub const BACK_SURFACE_MARGIN: u32 = 256;
/// Width of the pre-rendered text strip: 1.6 screens, rounded.
pub const TEXT_STRIP_WIDTH: u32 = 666;
/// Wave table samples the background advances per demo tick.
pub const BACK_WAVE_SPEED: usize = 5;
/// Wave table samples the text advances per demo tick.
pub const FRONT_WAVE_SPEED: usize = 10;

const BACK_BASE_OFFSET: i64 = 80;
const BACK_BOUNCE: f64 = 30.0;
const FRONT_BOUNCE: f64 = 18.0;

/// Vertical bounce in rows for a given amplitude at `iteration`.
pub fn bounce(amplitude: f64, iteration: u64) -> u32 {
    (amplitude * (iteration as f64 * 0.1).sin().abs()).floor() as u32
}

/// Repeats `tile` horizontally across a surface wide enough for the
/// distortion to read past the screen edge.
///
/// The surface spans at least a screen plus one whole tile, so a full row
/// can be read from any column of the first tile.
pub fn tile_background(tile: &Pixmap) -> Pixmap {
    if tile.width() == 0 {
        return Pixmap::new(SCREEN_WIDTH + BACK_SURFACE_MARGIN, tile.height());
    }
    let tiles = (SCREEN_WIDTH + tile.width()).div_ceil(tile.width());
    let width = (tiles * tile.width()).max(SCREEN_WIDTH + BACK_SURFACE_MARGIN);
    let mut surface = Pixmap::new(width, tile.height());
    let mut x = 0;
    while x < surface.width() {
        surface.blit(tile, 0, 0, tile.width(), tile.height(), x as i32, 0);
        x += tile.width();
    }
    surface
}

/// Leftmost text displacement over the visible scanlines, never negative.
///
/// This is the pixel offset the scroll cursor has to cover.
pub fn scroll_target(foreground: &WaveChannel, front_wave_pos: usize, lines: u32) -> i64 {
    (0..lines as usize)
        .map(|line| foreground.sample(front_wave_pos + line))
        .min()
        .unwrap_or(0)
        .max(0)
}

/// Per-frame inputs of the compositor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameState {
    pub iteration: u64,
    pub back_wave_pos: usize,
    pub front_wave_pos: usize,
    /// Pixel offset of the first character drawn into the text strip.
    pub letter_decal: i64,
}

impl FrameState {
    /// Moves to the next demo tick.
    pub fn advance(&mut self) {
        self.iteration += 1;
        self.back_wave_pos = self.iteration as usize * BACK_WAVE_SPEED;
        self.front_wave_pos = self.iteration as usize * FRONT_WAVE_SPEED;
    }
}

/// Source rows for one output scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanlinePlan {
    pub back_x: u32,
    pub back_y: u32,
    /// Strip column and row, or `None` when the text is out of range.
    pub text: Option<(u32, u32)>,
}

/// Builds frames one scanline at a time from the tiled background and the
/// text strip. Every scanline depends only on the frame state and its own
/// row index.
#[derive(Debug)]
pub struct FrameCompositor<'a> {
    tables: &'a WaveTables,
    background: &'a Pixmap,
    back_tile_width: u32,
    strip: &'a Pixmap,
}

impl<'a> FrameCompositor<'a> {
    pub fn new(
        tables: &'a WaveTables,
        background: &'a Pixmap,
        back_tile_width: u32,
        strip: &'a Pixmap,
    ) -> Self {
        Self {
            tables,
            background,
            back_tile_width: back_tile_width.max(1),
            strip,
        }
    }

    pub fn plan(&self, state: &FrameState, line: u32, screen_width: u32) -> ScanlinePlan {
        let back_offset = self
            .tables
            .background
            .sample(state.back_wave_pos + line as usize);
        let back_x = (BACK_BASE_OFFSET + back_offset / 2).rem_euclid(i64::from(self.back_tile_width)) as u32;
        let back_y = (line + bounce(BACK_BOUNCE, state.iteration)) % self.background.height().max(1);

        let front_offset = self
            .tables
            .foreground
            .sample(state.front_wave_pos + line as usize);
        let scroll_x = front_offset - state.letter_decal;
        let visible = i64::from(self.strip.width()) - i64::from(screen_width);
        let text = (scroll_x >= 0 && scroll_x < visible).then(|| {
            let row = (line + bounce(FRONT_BOUNCE, state.iteration)) % self.strip.height().max(1);
            (scroll_x as u32, row)
        });

        ScanlinePlan {
            back_x,
            back_y,
            text,
        }
    }

    /// Clears `dst` and fills every row with its background span and, where
    /// in range, the text span blended on top.
    pub fn composite(&self, state: &FrameState, dst: &mut Pixmap) {
        dst.clear();
        let width = dst.width();
        for (line, row) in dst.rows_mut().enumerate() {
            let plan = self.plan(state, line as u32, width);

            if self.background.height() > 0 {
                copy_span(row, self.background.row(plan.back_y), plan.back_x);
            }
            if let Some((x, y)) = plan.text {
                copy_span(row, self.strip.row(y), x);
            }
        }
    }
}

fn copy_span(row: &mut [u8], source: &[u8], from_x: u32) {
    let start = (from_x as usize * 4).min(source.len());
    let len = row.len().min(source.len() - start);
    blend_span(&mut row[..len], &source[start..start + len]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{SCREEN_HEIGHT, TRANSPARENT};
    use crate::text::FONT_HEIGHT;
    use crate::wave::WaveTable;

    fn flat_tables(back: Vec<i32>, front: Vec<i32>) -> WaveTables {
        WaveTables {
            background: WaveChannel {
                intro: WaveTable::default(),
                main: WaveTable::from(back),
            },
            foreground: WaveChannel {
                intro: WaveTable::default(),
                main: WaveTable::from(front),
            },
        }
    }

    fn striped_tile() -> Pixmap {
        let mut tile = Pixmap::new(8, 64);
        for x in 0..8 {
            tile.fill_rect(x, 0, 1, 64, [x as u8 * 10, 0, 0, 255]);
        }
        tile
    }

    #[test]
    fn bounce_follows_absolute_sine() {
        assert_eq!(bounce(30.0, 0), 0);
        // sin(1.6) is just below 1.
        assert_eq!(bounce(30.0, 16), 29);
        assert_eq!(bounce(18.0, 16), 17);
    }

    #[test]
    fn scroll_target_is_the_clamped_minimum() {
        let channel = WaveChannel {
            intro: WaveTable::from(vec![5, 3, 9]),
            main: WaveTable::from(vec![1]),
        };
        assert_eq!(scroll_target(&channel, 0, 3), 3);
        assert_eq!(scroll_target(&channel, 1, 2), 3);

        let falling = WaveChannel {
            intro: WaveTable::default(),
            main: WaveTable::from(vec![-4, -8]),
        };
        assert_eq!(scroll_target(&falling, 0, 4), 0);
    }

    #[test]
    fn background_source_wraps_negative_offsets() {
        let tables = flat_tables(vec![-166], vec![0]);
        let background = tile_background(&striped_tile());
        let strip = Pixmap::new(TEXT_STRIP_WIDTH, FONT_HEIGHT);
        let compositor = FrameCompositor::new(&tables, &background, 8, &strip);

        // 80 + (-166 / 2) = -3, which wraps to 5 on an 8px tile.
        let plan = compositor.plan(&FrameState::default(), 0, SCREEN_WIDTH);
        assert_eq!(plan.back_x, 5);
        assert_eq!(plan.back_y, 0);
    }

    #[test]
    fn text_only_draws_inside_the_strip() {
        let background = tile_background(&striped_tile());
        let strip = Pixmap::new(TEXT_STRIP_WIDTH, FONT_HEIGHT);

        for (offset, visible) in [(0, true), (249, true), (250, false), (-1, false)] {
            let tables = flat_tables(vec![0], vec![offset]);
            let compositor = FrameCompositor::new(&tables, &background, 8, &strip);
            let plan = compositor.plan(&FrameState::default(), 0, SCREEN_WIDTH);
            assert_eq!(plan.text.is_some(), visible, "offset {offset}");
        }
    }

    #[test]
    fn transparent_text_keeps_the_background() {
        let tables = flat_tables(vec![0], vec![10]);
        let background = tile_background(&striped_tile());
        let mut strip = Pixmap::new(TEXT_STRIP_WIDTH, FONT_HEIGHT);
        strip.fill_rect(20, 0, 4, FONT_HEIGHT, [0, 255, 0, 255]);

        let compositor = FrameCompositor::new(&tables, &background, 8, &strip);
        let mut frame = Pixmap::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        compositor.composite(&FrameState::default(), &mut frame);

        // Background starts at column 80 % 8 = 0 of the tile.
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(frame.pixel(3, 100), Some([30, 0, 0, 255]));
        // Strip column 20 lands on screen column 10.
        assert_eq!(frame.pixel(10, 0), Some([0, 255, 0, 255]));
        assert_eq!(frame.pixel(14, 0), Some([60, 0, 0, 255]));
        assert_ne!(frame.pixel(SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1), Some(TRANSPARENT));
    }

    #[test]
    fn frame_state_advances_at_fixed_speeds() {
        let mut state = FrameState::default();
        state.advance();
        state.advance();
        assert_eq!(state.iteration, 2);
        assert_eq!(state.back_wave_pos, 10);
        assert_eq!(state.front_wave_pos, 20);
    }

    #[test]
    fn tiles_cover_the_whole_surface() {
        let surface = tile_background(&striped_tile());
        assert_eq!(surface.width(), SCREEN_WIDTH + BACK_SURFACE_MARGIN);
        assert_eq!(surface.pixel(8 * 50 + 3, 10), Some([30, 0, 0, 255]));
    }

    #[test]
    fn wide_tiles_fill_every_row_from_any_column() {
        let tile = Pixmap::filled(300, 64, [9, 9, 9, 255]);
        let surface = tile_background(&tile);
        assert_eq!(surface.width(), 900);

        // 80 + 438 / 2 = 299, the last column of the tile.
        let tables = flat_tables(vec![438], vec![0]);
        let strip = Pixmap::new(TEXT_STRIP_WIDTH, FONT_HEIGHT);
        let compositor = FrameCompositor::new(&tables, &surface, tile.width(), &strip);
        assert_eq!(compositor.plan(&FrameState::default(), 0, SCREEN_WIDTH).back_x, 299);

        let mut frame = Pixmap::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        compositor.composite(&FrameState::default(), &mut frame);
        for y in [0, SCREEN_HEIGHT - 1] {
            assert_eq!(frame.pixel(SCREEN_WIDTH - 1, y), Some([9, 9, 9, 255]));
        }
    }
}
