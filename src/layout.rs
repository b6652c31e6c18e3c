//! partitions the terminal into the dashboard's panes.
//!
//! beneath a two-row header, the viewport is split into a grid of three rows and two columns:
//!
//! ```text
//! +---------+---------+
//! | cpu     | mem     |
//! +---------+---------+
//! | temp    | disk    |
//! +---------+---------+
//! | tasks   | net     |
//! +---------+---------+
//! ```
//!
//! rows and columns are divided evenly, and the remainder of each division goes to the last row
//! or column, so the grid tiles the viewport exactly.

use {
    crate::frame::Region,
    std::sync::atomic::{AtomicBool, Ordering},
};


/// the height of the header band.
pub const HEADER_HEIGHT: u16 = 2;

/// the smallest size of a pane.
pub const MIN_PANE_WIDTH: u16 = 20;
pub const MIN_PANE_HEIGHT: u16 = 6;

/// the smallest viewport in which every pane can be given its minimum size.
///
/// smaller viewports are laid out as if they were this size, and then clipped.
pub const MIN_WIDTH: u16 = MIN_PANE_WIDTH * COLUMNS;
pub const MIN_HEIGHT: u16 = HEADER_HEIGHT + MIN_PANE_HEIGHT * ROWS;

const ROWS: u16 = 3;
const COLUMNS: u16 = 2;

/// the panes of the dashboard.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PaneId {
    Cpu,
    Mem,
    Temp,
    Disk,
    Tasks,
    Net,
}

/// the regions of a viewport.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Layout {
    width: u16,
    height: u16,
    header: Region,
    /// pane regions, in the order of [`PaneId::ALL`].
    panes: [Region; 6],
}

/// keeps the layout in step with the size of the terminal.
#[derive(Debug)]
pub struct LayoutEngine {
    layout: Layout,
}

/// a notification that the terminal was resized.
///
/// this holds a single pending notification. raising it again before it is taken has no
/// further effect.
#[derive(Debug, Default)]
pub struct ResizeFlag(AtomicBool);

// === impl PaneId ===

impl PaneId {
    pub const ALL: [Self; 6] = [
        Self::Cpu,
        Self::Mem,
        Self::Temp,
        Self::Disk,
        Self::Tasks,
        Self::Net,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Cpu => "cpu-graph",
            Self::Mem => "mem-graph",
            Self::Temp => "temp-graph",
            Self::Disk => "disk-graph",
            Self::Tasks => "tasks",
            Self::Net => "net-graph",
        }
    }

    /// returns the row and column of the grid this pane occupies.
    fn position(self) -> (u16, u16) {
        let i = self as u16;
        (i / COLUMNS, i % COLUMNS)
    }
}

// === impl Layout ===

impl Layout {
    /// lays out a viewport of the given size.
    pub fn compute(width: u16, height: u16) -> Self {
        let viewport = Region::new(0, 0, width, height);
        let (w, h) = (width.max(MIN_WIDTH), height.max(MIN_HEIGHT));

        let available = h - HEADER_HEIGHT;
        let row_height = available / ROWS;
        let column_width = w / COLUMNS;

        // the last row and column take the remainder.
        let rows = [row_height, row_height, available - row_height * (ROWS - 1)];
        let columns = [column_width, w - column_width];

        let panes = PaneId::ALL.map(|pane| {
            let (row, column) = pane.position();
            let y = HEADER_HEIGHT + row_height * row;
            let x = column_width * column;
            let region = Region::new(x, y, columns[column as usize], rows[row as usize]);
            region.intersect(&viewport)
        });

        Self {
            width,
            height,
            header: Region::new(0, 0, w, HEADER_HEIGHT).intersect(&viewport),
            panes,
        }
    }

    pub fn header(&self) -> Region {
        self.header
    }

    pub fn pane(&self, pane: PaneId) -> Region {
        self.panes[pane as usize]
    }

    /// returns each pane and its region.
    pub fn panes(&self) -> impl Iterator<Item = (PaneId, Region)> + '_ {
        PaneId::ALL.into_iter().zip(self.panes)
    }

    /// the size of the viewport this layout was computed for.
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}

// === impl LayoutEngine ===

impl LayoutEngine {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            layout: Layout::compute(width, height),
        }
    }

    /// recomputes the layout if the terminal was resized, or if its size has changed.
    ///
    /// returns `true` if the layout was recomputed.
    pub fn update(&mut self, width: u16, height: u16, resized: bool) -> bool {
        if !resized && self.layout.size() == (width, height) {
            return false;
        }

        self.layout = Layout::compute(width, height);
        true
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

// === impl ResizeFlag ===

impl ResizeFlag {
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// returns whether the flag was raised, lowering it.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}
