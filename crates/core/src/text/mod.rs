//! Bitmap font metrics, the banner texts and the cumulative layout table used
//! to map a pixel offset back to a banner character.

use std::collections::HashMap;

use serde::Serialize;

use crate::{render::Pixmap, wave::wrap_sum};

/// Height of every glyph cell in the font atlas.
pub const FONT_HEIGHT: u32 = 36;

const GAP: &str = "     ";

/// Location and advance of one glyph inside the font atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub atlas_x: u32,
    pub atlas_y: u32,
    pub width: u32,
}

/// Character to glyph lookup for the demo font.
#[derive(Debug, Clone, Default)]
pub struct GlyphMetrics {
    glyphs: HashMap<char, Glyph>,
}

impl GlyphMetrics {
    /// Metrics of the 480x216 demo font.
    pub fn standard() -> Self {
        const TABLE: [(char, u32, u32, u32); 52] = [
            (' ', 0, 0, 32),
            ('!', 48, 0, 16),
            ('"', 96, 0, 32),
            ('\'', 336, 0, 16),
            ('(', 384, 0, 32),
            (')', 432, 0, 32),
            ('+', 48, 36, 48),
            (',', 96, 36, 16),
            ('-', 144, 36, 32),
            ('.', 192, 36, 16),
            ('0', 288, 36, 48),
            ('1', 336, 36, 48),
            ('2', 384, 36, 48),
            ('3', 432, 36, 48),
            ('4', 0, 72, 48),
            ('5', 48, 72, 48),
            ('6', 96, 72, 48),
            ('7', 144, 72, 48),
            ('8', 192, 72, 48),
            ('9', 240, 72, 48),
            (':', 288, 72, 16),
            (';', 336, 72, 16),
            ('<', 384, 72, 32),
            ('=', 432, 72, 32),
            ('>', 0, 108, 32),
            ('?', 48, 108, 48),
            ('A', 144, 108, 48),
            ('B', 192, 108, 48),
            ('C', 240, 108, 48),
            ('D', 288, 108, 48),
            ('E', 336, 108, 48),
            ('F', 384, 108, 48),
            ('G', 432, 108, 48),
            ('H', 0, 144, 48),
            ('I', 48, 144, 16),
            ('J', 96, 144, 48),
            ('K', 144, 144, 48),
            ('L', 192, 144, 48),
            ('M', 240, 144, 48),
            ('N', 288, 144, 48),
            ('O', 336, 144, 48),
            ('P', 384, 144, 48),
            ('Q', 432, 144, 48),
            ('R', 0, 180, 48),
            ('S', 48, 180, 48),
            ('T', 96, 180, 48),
            ('U', 144, 180, 48),
            ('V', 192, 180, 48),
            ('W', 240, 180, 48),
            ('X', 288, 180, 48),
            ('Y', 336, 180, 48),
            ('Z', 384, 180, 48),
        ];

        let glyphs = TABLE
            .iter()
            .map(|&(ch, atlas_x, atlas_y, width)| {
                (
                    ch,
                    Glyph {
                        atlas_x,
                        atlas_y,
                        width,
                    },
                )
            })
            .collect();
        Self { glyphs }
    }

    pub fn insert(&mut self, ch: char, glyph: Glyph) {
        self.glyphs.insert(ch, glyph);
    }

    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn width(&self, ch: char) -> Option<u32> {
        self.get(ch).map(|glyph| glyph.width)
    }

    /// Draws `ch` with its top-left corner at `(x, y)`. Unknown characters
    /// draw nothing and return `None`.
    pub fn draw(&self, dst: &mut Pixmap, atlas: &Pixmap, ch: char, x: i32, y: i32) -> Option<u32> {
        let glyph = self.get(ch)?;
        dst.blit(
            atlas,
            glyph.atlas_x as i32,
            glyph.atlas_y as i32,
            glyph.width,
            FONT_HEIGHT,
            x,
            y,
        );
        Some(glyph.width)
    }
}

/// The main scroller text.
pub fn banner_text() -> String {
    [
        GAP,
        GAP,
        GAP,
        "BILIZIR PRESENTS HIS SECOND DEMO-SCREEN IN GOLANG USING EBITEN.",
        GAP,
        "THE CREDITS FOR THIS SCREEN : ",
        "ORIGINAL SCREEN AND IDEA BY DYNO, ",
        "CODED IN GOLANG BY BILIZIR FROM DMA, ",
        "ORIGINAL FONT BY OXAR, ",
        "BACKGROUND BY AGENT-T CREAM, ",
        "MUSIC BY MAD MAX FROM THE EXCEPTIONS.",
        GAP,
        "AND NOW, SOME GREETING :  ",
        "MEGA-GREETINGS TO ALL MEMBERS OF DMA (PDM, COCO, JINX, TWISTER, DWORKIN) AND ALL MEMBERS OF THE UNION ! ",
        "LAST BUT NOT LEAST, I'D LIKE TO SEND A SPECIAL DEDICATION TO ALL DEMOSCENE LOVERS ",
        GAP,
        "IT'S NOW TIME TO WRAP !",
        GAP,
    ]
    .concat()
}

/// The typewriter text shown before the main screen.
pub fn intro_text() -> String {
    [
        GAP,
        "ONCE UPON A TIME, THERE WAS A SCREEN CALLED <THE PARALLAX DISTORTER> BY ULM.      ",
        "35 YEARS LATER, JUST FOR FUN, BILIZIR RECODED A VERSION IN GOLANG (ADAPTED FROM DYNO'S VERSION) !                    ",
    ]
    .concat()
}

/// A text reduced to the characters the font can draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    chars: Vec<char>,
}

impl Banner {
    pub fn new(text: &str, glyphs: &GlyphMetrics) -> Self {
        let chars = text.chars().filter(|&ch| glyphs.get(ch).is_some()).collect();
        Self { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Character at `index`, wrapping around the end of the text.
    pub fn char_at(&self, index: usize) -> Option<char> {
        if self.chars.is_empty() {
            return None;
        }
        Some(self.chars[index % self.chars.len()])
    }

    /// Fills `strip` with glyphs starting at character `first`, wrapping
    /// around the banner until the strip is full. The strip is cleared to
    /// transparent first.
    pub fn render_strip(&self, strip: &mut Pixmap, atlas: &Pixmap, glyphs: &GlyphMetrics, first: usize) {
        strip.clear();
        if self.chars.is_empty() {
            return;
        }

        let mut x = 0u32;
        let mut index = first;
        while x < strip.width() {
            let Some(ch) = self.char_at(index) else {
                break;
            };
            match glyphs.draw(strip, atlas, ch, x as i32, 0) {
                Some(0) | None => break,
                Some(width) => x += width,
            }
            index += 1;
        }
    }
}

/// Cumulative pixel width of the banner, one entry per character.
///
/// Entry `i` is the right edge of character `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PositionTable(Vec<i32>);

impl PositionTable {
    pub fn build(banner: &Banner, glyphs: &GlyphMetrics) -> Self {
        let mut count = 0;
        let positions = banner
            .chars()
            .iter()
            .filter_map(|&ch| glyphs.width(ch))
            .map(|width| {
                count += width as i32;
                count
            })
            .collect();
        Self(positions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Left edge of character `index` in pixels.
    ///
    /// Indices past the end keep counting through repeated passes of the
    /// banner. Non-positive indices and empty tables yield zero.
    pub fn position_of(&self, index: isize) -> i64 {
        if index <= 0 {
            return 0;
        }
        wrap_sum(&self.0, (index - 1) as usize, 0)
    }
}

impl From<Vec<i32>> for PositionTable {
    fn from(positions: Vec<i32>) -> Self {
        Self(positions)
    }
}
