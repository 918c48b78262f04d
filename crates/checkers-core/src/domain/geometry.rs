//! Grid-to-pixel mapping.
//!
//! Every square is a `cell_size`×`cell_size` pixel block and square `(x, y)`
//! starts at pixel `(x * cell_size, y * cell_size)`.  Click hit-testing is the
//! inverse: floor-divide the pointer position by the cell size.

/// Default square size in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 40;

/// Pixel rectangle occupied by one square, `x2`/`y2` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

/// Maps between pixel coordinates and (unchecked) cell indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    cell_size: u32,
}

impl BoardGeometry {
    /// Creates a geometry with the given square size.  Zero is clamped to one
    /// pixel so that hit-testing never divides by zero.
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_size: cell_size.max(1),
        }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Returns the cell indices under a pixel position.
    ///
    /// Uses floor division, so a pixel left of or above the canvas maps to a
    /// negative index (which the board bounds check then rejects) instead of
    /// being truncated towards zero into square 0.
    pub fn cell_at(&self, pixel_x: i64, pixel_y: i64) -> (i64, i64) {
        let size = i64::from(self.cell_size);
        (pixel_x.div_euclid(size), pixel_y.div_euclid(size))
    }

    /// Returns the pixel rectangle of square `(x, y)`.
    pub fn cell_rect(&self, x: usize, y: usize) -> CellRect {
        let size = i64::from(self.cell_size);
        let x1 = x as i64 * size;
        let y1 = y as i64 * size;
        CellRect {
            x1,
            y1,
            x2: x1 + size,
            y2: y1 + size,
        }
    }

    /// Pixel side length of a canvas holding a `board_size`×`board_size` grid.
    pub fn canvas_size(&self, board_size: usize) -> u64 {
        board_size as u64 * u64::from(self.cell_size)
    }
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
