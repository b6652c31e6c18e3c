//! an in-memory grid of styled character cells.
//!
//! the dashboard is drawn into a [`Frame`] from scratch on every tick, and the finished frame is
//! then presented to the terminal in one pass. each pane draws through a [`View`], which
//! translates pane-local coordinates and clips everything to the pane's region.

use {crossterm::style::Color, unicode_width::UnicodeWidthChar};


/// a rectangle of terminal cells.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Region {
    /// left edge, inclusive.
    pub x: u16,
    /// top edge, inclusive.
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// how a cell is drawn.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Style {
    /// the foreground color, or the terminal's default.
    pub fg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
}

/// a single character cell.
///
/// a glyph two columns wide is followed by a [`Cell::WIDE_TAIL`] cell, which is covered by the
/// glyph to its left and draws nothing itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub style: Style,
}

/// a grid of cells covering the whole terminal.
#[derive(Clone, Debug)]
pub struct Frame {
    width: u16,
    height: u16,
    /// cells in row-major order.
    cells: Vec<Cell>,
}

/// exclusive access to one region of a [`Frame`].
///
/// coordinates are relative to the region's top-left corner. writes outside of the region, or
/// outside of the frame, are discarded.
pub struct View<'a> {
    frame: &'a mut Frame,
    /// the region being drawn, which may extend past the edge of the frame.
    area: Region,
}

// === impl Region ===

impl Region {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// right edge, exclusive.
    pub fn right(&self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// bottom edge, exclusive.
    pub fn bottom(&self) -> u32 {
        self.y as u32 + self.height as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        let (x, y) = (x as u32, y as u32);
        x >= self.x as u32 && x < self.right() && y >= self.y as u32 && y < self.bottom()
    }

    /// returns the overlap of two regions, which is empty if they are disjoint.
    pub fn intersect(&self, other: &Region) -> Region {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if (x as u32) < right && (y as u32) < bottom {
            // both edges lie within a `u16` region, so the sizes fit in a `u16`.
            let width = (right - x as u32) as u16;
            let height = (bottom - y as u32) as u16;
            Region::new(x, y, width, height)
        } else {
            Region::default()
        }
    }

    /// returns whether two regions share any cell.
    pub fn overlaps(&self, other: &Region) -> bool {
        !self.intersect(other).is_empty()
    }
}

// === impl Style ===

impl Style {
    pub const PLAIN: Self = Self {
        fg: None,
        bold: false,
        dim: false,
    };

    pub const fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            ..Self::PLAIN
        }
    }

    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub const fn dim(self) -> Self {
        Self { dim: true, ..self }
    }
}

// === impl Cell ===

impl Cell {
    pub const BLANK: Self = Self {
        glyph: ' ',
        style: Style::PLAIN,
    };

    /// the glyph of a cell covered by a wide glyph to its left.
    pub const WIDE_TAIL: char = '\0';

    /// drawn in place of control characters.
    pub const REPLACEMENT: char = '?';

    /// returns how a character is drawn, and how many columns it takes.
    ///
    /// control characters are replaced, so that text read from the system can never send escape
    /// sequences to the terminal. combining marks and other zero-width characters take no
    /// columns, and are not drawn.
    pub fn displayed(c: char) -> (char, u16) {
        if c.is_control() {
            return (Self::REPLACEMENT, 1);
        }
        (c, c.width().unwrap_or(0) as u16)
    }

    /// returns whether this cell is drawn by the wide glyph to its left.
    pub fn is_wide_tail(&self) -> bool {
        self.glyph == Self::WIDE_TAIL
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

// === impl Frame ===

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; size],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// the region covering the whole frame.
    pub fn region(&self) -> Region {
        Region::new(0, 0, self.width, self.height)
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// returns the cells of one row.
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// returns the glyphs of one row, ignoring their styles.
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .iter()
            .filter(|c| !c.is_wide_tail())
            .map(|c| c.glyph)
            .collect()
    }

    /// blanks every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// resizes the frame, blanking every cell.
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    /// returns a [`View`] drawing into the given region.
    pub fn view(&mut self, area: Region) -> View<'_> {
        View { frame: self, area }
    }

    /// replaces a cell. a wide glyph and its tail are only ever replaced together.
    fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };

        if self.cells[i].is_wide_tail() && !cell.is_wide_tail() && x > 0 {
            self.cells[i - 1] = Cell::BLANK;
        }
        let next = x.checked_add(1).and_then(|x| self.index(x, y));
        if let Some(next) = next.filter(|n| self.cells[*n].is_wide_tail()) {
            self.cells[next] = Cell::BLANK;
        }

        self.cells[i] = cell;
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}

// === impl View ===

impl View<'_> {
    const TOP_LEFT: char = '┌';
    const TOP_RIGHT: char = '┐';
    const BOTTOM_LEFT: char = '└';
    const BOTTOM_RIGHT: char = '┘';
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';

    pub fn width(&self) -> u16 {
        self.area.width
    }

    pub fn height(&self) -> u16 {
        self.area.height
    }

    /// draws a glyph at a region-local position.
    pub fn put(&mut self, x: u16, y: u16, glyph: char, style: Style) {
        if let Some((x, y)) = self.absolute(x, y) {
            self.frame.set(x, y, Cell { glyph, style });
        }
    }

    /// returns the glyph at a region-local position, if it is visible.
    pub fn glyph(&self, x: u16, y: u16) -> Option<char> {
        let (x, y) = self.absolute(x, y)?;
        self.frame.cell(x, y).map(|c| c.glyph)
    }

    /// prints text starting at a region-local position, clipped to the region.
    ///
    /// control characters are drawn as [`Cell::REPLACEMENT`]. a wide glyph that would only
    /// partly fit ends the text. returns the number of columns the text occupies.
    pub fn print(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let mut cursor = x;
        for (glyph, width) in text.chars().map(Cell::displayed) {
            if width == 0 {
                continue;
            }
            let Some(end) = cursor.checked_add(width).filter(|end| *end <= self.area.width) else {
                break;
            };
            if self.absolute(end - 1, y).is_none() {
                break;
            }

            self.put(cursor, y, glyph, style);
            if width == 2 {
                self.put(cursor + 1, y, Cell::WIDE_TAIL, style);
            }
            cursor = end;
        }
        cursor.saturating_sub(x)
    }

    /// draws a line of one glyph across a row, from column `from` up to but excluding `to`.
    pub fn fill_row(&mut self, y: u16, from: u16, to: u16, glyph: char, style: Style) {
        for x in from..to.min(self.area.width) {
            self.put(x, y, glyph, style);
        }
    }

    /// draws a border around the edge of the region.
    pub fn boxed(&mut self, style: Style) {
        let (width, height) = (self.area.width, self.area.height);
        if width < 2 || height < 2 {
            return;
        }
        let (right, bottom) = (width - 1, height - 1);

        self.fill_row(0, 1, right, Self::HORIZONTAL, style);
        self.fill_row(bottom, 1, right, Self::HORIZONTAL, style);
        for y in 1..bottom {
            self.put(0, y, Self::VERTICAL, style);
            self.put(right, y, Self::VERTICAL, style);
        }
        self.put(0, 0, Self::TOP_LEFT, style);
        self.put(right, 0, Self::TOP_RIGHT, style);
        self.put(0, bottom, Self::BOTTOM_LEFT, style);
        self.put(right, bottom, Self::BOTTOM_RIGHT, style);
    }

    /// translates a region-local position into frame coordinates.
    fn absolute(&self, x: u16, y: u16) -> Option<(u16, u16)> {
        let Region {
            x: left,
            y: top,
            width,
            height,
        } = self.area;

        if x >= width || y >= height {
            return None;
        }
        let x = left.checked_add(x)?;
        let y = top.checked_add(y)?;
        (x < self.frame.width && y < self.frame.height).then_some((x, y))
    }
}
