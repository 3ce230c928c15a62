//! Fixed page geometry: paper sizes, margins, columns, grid.

use super::options::Columns;
use serde::{Deserialize, Serialize};

/// Paper sizes supported for export (72 DPI points).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    B4,
    B3,
}

impl PageSize {
    /// `(width, height)` in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.0, 842.0),
            PageSize::A3 => (842.0, 1191.0),
            PageSize::B4 => (729.0, 1032.0),
            PageSize::B3 => (1032.0, 1460.0),
        }
    }

    /// Page width in points.
    pub fn width(self) -> f32 {
        self.dimensions().0
    }

    /// Page height in points.
    pub fn height(self) -> f32 {
        self.dimensions().1
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// Margins used for every page size.
pub const MARGINS: Margins = Margins {
    top: 72.0,
    bottom: 72.0,
    left: 54.0,
    right: 54.0,
};

/// Horizontal gap placed after each column.
pub const COLUMN_GAP: f32 = 20.0;

/// Editor snapping grid.
pub const GRID_SIZE: f32 = 20.0;

/// Width of block content for the given column count.
///
/// This is a design constant tied to the smallest paper width and is not
/// recomputed for larger page sizes.
pub fn content_width(columns: Columns) -> f32 {
    match columns {
        Columns::One => 500.0,
        Columns::Two => 250.0,
    }
}

/// Round a coordinate to the nearest grid line.
pub fn snap_to_grid(value: f32) -> f32 {
    (value / GRID_SIZE).round() * GRID_SIZE
}

/// Resolved geometry for one layout run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    pub columns: usize,
    /// Nominal per-column share of the work area
    pub column_width: f32,
    pub column_gap: f32,
}

impl PageGeometry {
    /// Geometry for a page size and column count.
    pub fn new(page_size: PageSize, columns: Columns) -> Self {
        let (width, height) = page_size.dimensions();
        let columns = columns.count();
        let work_width = width - MARGINS.left - MARGINS.right;
        Self {
            width,
            height,
            margins: MARGINS,
            columns,
            column_width: work_width / columns as f32,
            column_gap: COLUMN_GAP,
        }
    }

    /// Width between the left and right margins.
    pub fn work_area_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    /// Height between the top and bottom margins.
    pub fn work_area_height(&self) -> f32 {
        self.height - self.margins.top - self.margins.bottom
    }

    /// Left edge of a column.
    ///
    /// The gap is added on top of the nominal column share rather than
    /// taken out of it, so the last column of a multi-column layout can
    /// reach past the right margin.
    pub fn column_x(&self, column: usize) -> f32 {
        self.margins.left + column as f32 * (self.column_width + self.column_gap)
    }

    /// Lowest y a block may reach before it overflows the column.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margins.bottom
    }

    /// Right edge of the printable area.
    pub fn printable_right(&self) -> f32 {
        self.width - self.margins.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_dimensions() {
        assert_eq!(PageSize::A4.dimensions(), (595.0, 842.0));
        assert_eq!(PageSize::A3.dimensions(), (842.0, 1191.0));
        assert_eq!(PageSize::B4.dimensions(), (729.0, 1032.0));
        assert_eq!(PageSize::B3.dimensions(), (1032.0, 1460.0));
    }

    #[test]
    fn test_single_column_geometry() {
        let g = PageGeometry::new(PageSize::A4, Columns::One);
        assert_eq!(g.column_width, 487.0);
        assert_eq!(g.column_x(0), 54.0);
        assert_eq!(g.bottom_limit(), 770.0);
        assert_eq!(g.work_area_height(), 698.0);
    }

    #[test]
    fn test_second_column_overshoots_margin() {
        let g = PageGeometry::new(PageSize::A4, Columns::Two);
        assert_eq!(g.column_width, 243.5);
        assert_eq!(g.column_x(1), 54.0 + 243.5 + 20.0);
        // Gap is not taken from the work area budget.
        assert!(g.column_x(1) + g.column_width > g.printable_right());
    }

    #[test]
    fn test_content_width_is_fixed() {
        assert_eq!(content_width(Columns::One), 500.0);
        assert_eq!(content_width(Columns::Two), 250.0);
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(0.0), 0.0);
        assert_eq!(snap_to_grid(9.0), 0.0);
        assert_eq!(snap_to_grid(11.0), 20.0);
        assert_eq!(snap_to_grid(95.0), 100.0);
    }
}
