use std::time::Duration;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Derives the grid from a canvas size in pixels and a square cell size.
    ///
    /// Partial cells at the right and bottom edges are dropped.
    #[must_use]
    pub fn from_canvas(canvas: CanvasSize, cell_pixels: u16) -> Self {
        debug_assert!(cell_pixels > 0);

        Self {
            width: canvas.width_px / cell_pixels,
            height: canvas.height_px / cell_pixels,
        }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Drawing surface size in pixels.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CanvasSize {
    pub width_px: u16,
    pub height_px: u16,
}

/// Canvas the classic board is laid out on.
pub const DEFAULT_CANVAS: CanvasSize = CanvasSize {
    width_px: 600,
    height_px: 600,
};

/// Edge length of one grid cell in canvas pixels.
pub const CELL_PIXEL_SIZE: u16 = 20;

/// Terminal columns used to draw one grid cell, keeping cells roughly square.
pub const CELL_COLUMNS: u16 = 2;

/// Terminal rows used to draw one grid cell.
pub const CELL_ROWS: u16 = 1;

/// Step interval a fresh game starts with.
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 150;

/// Fastest step interval the speed ramp may reach.
pub const MIN_STEP_INTERVAL_MS: u64 = 50;

/// Amount the interval shrinks on each speed-up.
pub const STEP_INTERVAL_DECREMENT_MS: u64 = 10;

/// Points awarded per food eaten.
pub const POINTS_PER_FOOD: u32 = 10;

/// Score multiple at which the game speeds up.
pub const POINTS_PER_SPEED_UP: u32 = 100;

/// Rejection-sampling attempts before food placement scans for free cells.
pub const FOOD_SAMPLE_ATTEMPTS: usize = 1024;

/// Input poll timeout while no step timer is active.
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Returns the interval following `current` after a speed-up, floored at the minimum.
#[must_use]
pub fn next_step_interval_ms(current: u64) -> u64 {
    current
        .saturating_sub(STEP_INTERVAL_DECREMENT_MS)
        .max(MIN_STEP_INTERVAL_MS)
}
