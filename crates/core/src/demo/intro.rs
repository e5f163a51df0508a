use crate::{
    render::{Pixmap, BLACK, SCREEN_WIDTH},
    text::{Banner, GlyphMetrics, FONT_HEIGHT},
};

/// Pixels the intro text moves per tick.
pub const INTRO_SPEED: i32 = 4;
/// The strip is wider than the screen so a whole glyph fits past the edge.
pub const INTRO_STRIP_WIDTH: u32 = SCREEN_WIDTH + 48;
/// Row of the main surface the intro text is drawn at.
pub const INTRO_STRIP_Y: i32 = 170;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroStep {
    Running,
    Finished,
}

/// Typewriter scroller that feeds one glyph at a time in from the right edge.
#[derive(Debug, Clone)]
pub struct IntroScroller {
    /// Pixels until the current glyph has fully entered; negative means the
    /// next glyph is due.
    pending: i32,
    letter: Option<usize>,
    tile: Option<usize>,
    strip: Pixmap,
    scratch: Pixmap,
}

impl Default for IntroScroller {
    fn default() -> Self {
        Self::new()
    }
}

impl IntroScroller {
    pub fn new() -> Self {
        Self {
            pending: -1,
            letter: None,
            tile: None,
            strip: Pixmap::new(INTRO_STRIP_WIDTH, FONT_HEIGHT),
            scratch: Pixmap::new(INTRO_STRIP_WIDTH, FONT_HEIGHT),
        }
    }

    pub fn strip(&self) -> &Pixmap {
        &self.strip
    }

    /// Scrolls one tick. Returns [`IntroStep::Finished`] once every
    /// character of `text` has been fed in.
    pub fn step(&mut self, text: &Banner, glyphs: &GlyphMetrics, atlas: &Pixmap) -> IntroStep {
        if self.pending < 0 {
            if let Some(width) = self
                .tile
                .and_then(|tile| text.char_at(tile))
                .and_then(|ch| glyphs.width(ch))
            {
                self.pending += width as i32;
            }

            let next = self.letter.map_or(0, |letter| letter + 1);
            self.letter = Some(next);
            if next >= text.len() {
                return IntroStep::Finished;
            }
            self.tile = Some(next);
        }
        self.pending -= INTRO_SPEED;

        self.scratch.clear();
        self.scratch.blit(
            &self.strip,
            INTRO_SPEED,
            0,
            INTRO_STRIP_WIDTH - INTRO_SPEED as u32,
            FONT_HEIGHT,
            0,
            0,
        );
        std::mem::swap(&mut self.strip, &mut self.scratch);

        if let Some(ch) = self.tile.and_then(|tile| text.char_at(tile)) {
            glyphs.draw(&mut self.strip, atlas, ch, SCREEN_WIDTH as i32 + self.pending, 0);
        }
        IntroStep::Running
    }

    /// Paints the intro frame: black with the strip across the lower half.
    pub fn draw_into(&self, main: &mut Pixmap) {
        main.fill(BLACK);
        main.blit(
            &self.strip,
            0,
            0,
            self.strip.width(),
            self.strip.height(),
            0,
            INTRO_STRIP_Y,
        );
    }
}
