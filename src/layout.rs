//! ASCII dungeon layouts.
//!
//! A layout is the demo host's answer to the collision hook: each character
//! is one grid cell, `#` a wall, `.` open floor, `S` the floor cell the player
//! starts on, and a space is void. Rows run along `+Z`, columns along `+X`.
//!
//! ```text
//! #####
//! #S..#
//! #.#.#
//! #...#
//! #####
//! ```

use std::num::TryFromIntError;

use glam::{IVec2, Vec3};
use hashbrown::HashSet;
use thiserror::Error;

use crate::intent::MoveValidator;

/// Errors raised by [`GridLayout::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The text contained no cells.
    #[error("layout is empty")]
    Empty,
    /// A character is not one of `#`, `.`, `S` or space.
    #[error("unknown glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        column: usize,
    },
    /// No `S` cell.
    #[error("layout has no start cell")]
    MissingStart,
    /// More than one `S` cell.
    #[error("second start cell at row {row}, column {column}")]
    DuplicateStart {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        column: usize,
    },
    /// The layout is too large to address with 32-bit cell coordinates.
    #[error("layout exceeds the addressable grid")]
    TooLarge,
}

impl From<TryFromIntError> for LayoutError {
    fn from(_: TryFromIntError) -> Self {
        Self::TooLarge
    }
}

/// Walls, floors and the start cell of a dungeon.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    walls: HashSet<IVec2>,
    floors: HashSet<IVec2>,
    start: IVec2,
    grid_size: f32,
}

impl GridLayout {
    /// Parses an ASCII layout whose cells are `grid_size` units wide.
    ///
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] for empty text, unknown glyphs, or a start
    /// cell count other than one.
    pub fn parse(text: &str, grid_size: f32) -> Result<Self, LayoutError> {
        let mut walls = HashSet::new();
        let mut floors = HashSet::new();
        let mut start = None;

        let rows = text.lines().filter(|line| !line.trim().is_empty());
        for (row, line) in rows.enumerate() {
            for (column, glyph) in line.trim_end().chars().enumerate() {
                let cell = IVec2::new(i32::try_from(column)?, i32::try_from(row)?);
                match glyph {
                    '#' => {
                        walls.insert(cell);
                    }
                    '.' => {
                        floors.insert(cell);
                    }
                    'S' => {
                        if start.is_some() {
                            return Err(LayoutError::DuplicateStart { row, column });
                        }
                        start = Some(cell);
                        floors.insert(cell);
                    }
                    ' ' => {}
                    other => {
                        return Err(LayoutError::UnknownGlyph {
                            glyph: other,
                            row,
                            column,
                        })
                    }
                }
            }
        }

        if walls.is_empty() && floors.is_empty() {
            return Err(LayoutError::Empty);
        }
        let start = start.ok_or(LayoutError::MissingStart)?;

        Ok(Self {
            walls,
            floors,
            start,
            grid_size,
        })
    }

    /// Cell the player starts on.
    #[must_use]
    pub const fn start_cell(&self) -> IVec2 {
        self.start
    }

    /// Width of one cell in world units.
    #[must_use]
    pub const fn grid_size(&self) -> f32 {
        self.grid_size
    }

    /// Iterates wall cells in no particular order.
    pub fn walls(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.walls.iter().copied()
    }

    /// Iterates floor cells, the start included, in no particular order.
    pub fn floors(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.floors.iter().copied()
    }

    /// World position of a cell's centre at floor level.
    #[must_use]
    pub fn cell_centre(&self, cell: IVec2) -> Vec3 {
        Vec3::new(cell.x as f32, 0.0, cell.y as f32) * self.grid_size
    }

    /// Cell containing a world position; height is ignored.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Positions come from cell centres, which fit in i32 by construction."
    )]
    pub fn cell_at(&self, position: Vec3) -> IVec2 {
        let scaled = position / self.grid_size;
        IVec2::new(scaled.x.round() as i32, scaled.z.round() as i32)
    }

    /// True when the cell is open floor.
    #[must_use]
    pub fn is_floor(&self, cell: IVec2) -> bool {
        self.floors.contains(&cell)
    }
}

impl MoveValidator for GridLayout {
    fn can_move(&self, _from: Vec3, to: Vec3) -> bool {
        self.is_floor(self.cell_at(to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const SAMPLE: &str = "
#####
#S..#
#.#.#
#...#
#####
";

    #[fixture]
    fn layout() -> GridLayout {
        GridLayout::parse(SAMPLE, 2.0).unwrap_or_else(|e| panic!("sample layout: {e}"))
    }

    #[rstest]
    fn parses_sample(layout: GridLayout) {
        assert_eq!(layout.start_cell(), IVec2::new(1, 1));
        assert_eq!(layout.floors().count(), 8);
        assert_eq!(layout.walls().count(), 17);
        assert!(layout.is_floor(IVec2::new(3, 3)));
        assert!(!layout.is_floor(IVec2::new(2, 2)));
    }

    #[rstest]
    fn cell_centre_round_trips(layout: GridLayout) {
        let cell = IVec2::new(3, 2);
        let centre = layout.cell_centre(cell);
        assert_eq!(centre, Vec3::new(6.0, 0.0, 4.0));
        assert_eq!(layout.cell_at(centre + Vec3::new(0.4, 1.7, -0.4)), cell);
    }

    #[rstest]
    #[case::open_floor(IVec2::new(2, 1), true)]
    #[case::wall(IVec2::new(2, 2), false)]
    #[case::outer_wall(IVec2::new(0, 1), false)]
    #[case::outside(IVec2::new(9, 9), false)]
    fn validator_only_allows_floor(
        layout: GridLayout,
        #[case] destination: IVec2,
        #[case] allowed: bool,
    ) {
        let from = layout.cell_centre(layout.start_cell());
        let to = layout.cell_centre(destination);
        assert_eq!(layout.can_move(from, to), allowed);
    }

    #[rstest]
    #[case::empty("\n  \n", LayoutError::Empty)]
    #[case::no_start("#.#", LayoutError::MissingStart)]
    #[case::two_starts("S.S", LayoutError::DuplicateStart { row: 0, column: 2 })]
    #[case::bad_glyph("#S?", LayoutError::UnknownGlyph { glyph: '?', row: 0, column: 2 })]
    fn rejects_malformed_layouts(#[case] text: &str, #[case] expected: LayoutError) {
        assert_eq!(GridLayout::parse(text, 1.0), Err(expected));
    }
}
