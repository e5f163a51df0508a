use crate::text::PositionTable;

/// Tracks which banner character sits under the scroller's left edge.
///
/// The tracker walks from the previously found character instead of
/// searching the whole table, so it relies on the target moving by less
/// than a few glyph widths between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollCursor {
    index: usize,
    letter_decal: i64,
}

impl ScrollCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the tracked character.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Left edge, in pixels, of the tracked character.
    pub fn letter_decal(&self) -> i64 {
        self.letter_decal
    }

    /// Moves the cursor so that `decal_x` falls inside the tracked
    /// character's span `[position_of(i), position_of(i + 1))`.
    ///
    /// The index is clamped to the table, so a target beyond the last
    /// character leaves the cursor on it.
    pub fn track(&mut self, positions: &PositionTable, decal_x: i64) {
        let len = positions.len() as isize;
        if len == 0 {
            *self = Self::default();
            return;
        }

        let dir: isize = match decal_x.cmp(&self.letter_decal) {
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
        };

        let mut index = self.index as isize;
        while decal_x < positions.position_of(index) || positions.position_of(index + 1) <= decal_x {
            if dir == 0 {
                break;
            }
            index += dir;
            if index < 0 || index >= len {
                break;
            }
        }

        self.index = index.clamp(0, len - 1) as usize;
        self.letter_decal = positions.position_of(self.index as isize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{banner_text, Banner, GlyphMetrics};

    fn banner_positions() -> PositionTable {
        let glyphs = GlyphMetrics::standard();
        PositionTable::build(&Banner::new(&banner_text(), &glyphs), &glyphs)
    }

    fn assert_contains(positions: &PositionTable, cursor: &ScrollCursor, decal_x: i64) {
        let index = cursor.index() as isize;
        assert!(
            positions.position_of(index) <= decal_x && decal_x < positions.position_of(index + 1),
            "cursor {index} does not contain {decal_x}"
        );
        assert_eq!(cursor.letter_decal(), positions.position_of(index));
    }

    #[test]
    fn lands_on_the_next_character_without_skipping() {
        let positions = PositionTable::from(vec![32, 48, 96, 112]);
        let mut cursor = ScrollCursor::new();

        cursor.track(&positions, 0);
        assert_eq!(cursor.index(), 0);

        cursor.track(&positions, 40);
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.letter_decal(), 32);
    }

    #[test]
    fn follows_a_target_moving_back_and_forth() {
        let positions = PositionTable::from(vec![32, 48, 96, 112]);
        let mut cursor = ScrollCursor::new();

        cursor.track(&positions, 100);
        assert_eq!(cursor.index(), 3);
        cursor.track(&positions, 47);
        assert_eq!(cursor.index(), 1);
        cursor.track(&positions, 48);
        assert_eq!(cursor.index(), 2);
        cursor.track(&positions, 0);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn contains_target_while_sweeping_up_and_down() {
        let positions = banner_positions();
        let total = positions.position_of(positions.len() as isize);
        let mut rng = fastrand::Rng::with_seed(42);
        let mut cursor = ScrollCursor::new();

        let mut decal_x = 0;
        while decal_x < total {
            cursor.track(&positions, decal_x);
            assert_contains(&positions, &cursor, decal_x);
            decal_x += rng.i64(0..40);
        }

        let mut decal_x = total - 1;
        while decal_x >= 0 {
            cursor.track(&positions, decal_x);
            assert_contains(&positions, &cursor, decal_x);
            decal_x -= rng.i64(0..40);
        }
    }

    #[test]
    fn index_moves_monotonically_with_the_target() {
        let positions = banner_positions();
        let total = positions.position_of(positions.len() as isize);
        let mut cursor = ScrollCursor::new();

        let mut previous = 0;
        for decal_x in 0..total {
            cursor.track(&positions, decal_x);
            assert!(cursor.index() >= previous);
            assert!(cursor.index() <= previous + 1, "skipped a character at {decal_x}");
            previous = cursor.index();
        }
        assert_eq!(previous, positions.len() - 1);
    }

    #[test]
    fn clamps_beyond_the_text() {
        let positions = PositionTable::from(vec![10, 20]);
        let mut cursor = ScrollCursor::new();

        cursor.track(&positions, 500);
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.letter_decal(), 10);

        cursor.track(&positions, -5);
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.letter_decal(), 0);
    }

    #[test]
    fn empty_table_resets_the_cursor() {
        let mut cursor = ScrollCursor::new();
        cursor.track(&PositionTable::default(), 100);
        assert_eq!(cursor, ScrollCursor::new());
    }
}
