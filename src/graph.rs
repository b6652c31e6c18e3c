//! time-series graphs.
//!
//! a [`Graph`] rasterizes the most recent samples of one or two [`RingHistory`]s onto the
//! interior of a bordered pane. each column of the interior plots one sample, oldest on the
//! left, and consecutive samples on different rows are joined by a vertical connector.

use crate::{
    format,
    frame::{Style, View},
    history::RingHistory,
};

#[cfg(test)]
mod tests;

/// the range of values a graph spans, from its bottom row to its top row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

/// one series of samples, and how to draw it.
#[derive(Clone, Copy, Debug)]
pub struct Series<'a> {
    /// a short name shown beside the latest value of a dual graph.
    pub label: &'a str,
    pub history: &'a RingHistory<f64>,
    pub style: Style,
}

/// the series a graph plots.
#[derive(Clone, Copy, Debug)]
pub enum Plot<'a> {
    Single(Series<'a>),
    /// two series sharing one domain. the second is drawn over the first.
    Dual(Series<'a>, Series<'a>),
}

/// a bordered time-series graph.
#[derive(Clone, Copy, Debug)]
pub struct Graph<'a> {
    pub title: &'a str,
    /// the suffix printed after each value.
    pub unit: &'a str,
    pub domain: Domain,
    pub plot: Plot<'a>,
    /// an additional line of text shown beneath the title of a dual graph.
    pub extra: Option<&'a str>,
}

/// a cell a series occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mark {
    /// a sample.
    Point,
    /// part of the line joining two samples.
    Connector,
}

/// the interior of a graph, in which series are traced.
struct Canvas {
    width: u16,
    height: u16,
    /// the cells occupied by the first series.
    occupied: Vec<bool>,
}

// === impl Domain ===

impl Domain {
    pub const PERCENT: Self = Self::new(0.0, 100.0);

    /// spans narrower than this are treated as a span of one.
    const DEGENERATE: f64 = 0.0001;

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        let span = self.max - self.min;
        if span <= Self::DEGENERATE { 1.0 } else { span }
    }

    /// returns where a value lies within the domain, from zero at its minimum to one at its
    /// maximum. values outside of the domain saturate.
    pub fn fraction(&self, value: f64) -> f64 {
        let t = (value - self.min) / self.span();
        if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
    }
}

// === impl Graph ===

impl Graph<'_> {
    /// the smallest interior a graph is traced in.
    const MIN_WIDTH: u16 = 10;
    const MIN_HEIGHT: u16 = 4;

    const POINT_A: char = 'o';
    const POINT_B: char = '*';
    const OVERLAP: char = 'X';

    /// draws the graph, filling the whole view.
    pub fn render(&self, view: &mut View<'_>) {
        let Self {
            title,
            unit,
            domain,
            plot,
            extra,
        } = self;

        view.boxed(Style::PLAIN);
        let (width, height) = (view.width(), view.height());
        let mut canvas = Canvas::new(width.saturating_sub(2), height.saturating_sub(2));
        if canvas.width < Self::MIN_WIDTH || canvas.height < Self::MIN_HEIGHT {
            return;
        }

        view.print(2, 0, &format!(" {title} "), Style::PLAIN.bold());

        let latest = match plot {
            Plot::Single(series) => format!("{:.1}{unit}", series.history.latest()),
            Plot::Dual(a, b) => format!(
                "{} {:.1}{unit}  {} {:.1}{unit}",
                a.label,
                a.history.latest(),
                b.label,
                b.history.latest()
            ),
        };
        let columns = format::columns(&latest).min(u16::MAX as usize) as u16;
        view.print(width.saturating_sub(columns + 2).max(2), 0, &latest, Style::PLAIN);

        // the shortest graph traced is six rows tall, which leaves room for the extra line.
        if let (Plot::Dual(..), Some(extra)) = (plot, extra) {
            let clipped = format::truncate(extra, width.saturating_sub(4) as usize);
            view.print(2, 1, clipped, Style::PLAIN);
        }

        let midline = 1 + canvas.height / 2;
        view.fill_row(midline, 1, 1 + canvas.width, View::HORIZONTAL, Style::PLAIN);

        match plot {
            Plot::Single(series) => {
                let count = series.history.len().min(canvas.width as usize);
                canvas.trace(view, series, *domain, count, false);
            }
            Plot::Dual(a, b) => {
                let count = a
                    .history
                    .len()
                    .min(b.history.len())
                    .min(canvas.width as usize);
                canvas.trace(view, a, *domain, count, false);
                canvas.trace(view, b, *domain, count, true);
            }
        }
    }
}

// === impl Canvas ===

impl Canvas {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            occupied: vec![false; width as usize * height as usize],
        }
    }

    /// returns the row a value is plotted on, counting down from the top of the interior.
    fn row(&self, domain: Domain, value: f64) -> u16 {
        let top = self.height - 1;
        let offset = (domain.fraction(value) * top as f64 + 0.5) as u16;
        top - offset.min(top)
    }

    /// traces the last `count` samples of a series.
    ///
    /// the first series marks the cells it occupies. the second series draws an overlap glyph
    /// wherever it lands on one of those cells.
    fn trace(
        &mut self,
        view: &mut View<'_>,
        series: &Series<'_>,
        domain: Domain,
        count: usize,
        second: bool,
    ) {
        let rows = series
            .history
            .last_n(count)
            .map(|value| self.row(domain, value))
            .collect::<Vec<_>>();

        for (x, y, mark) in Self::rasterize(&rows) {
            let index = y as usize * self.width as usize + x as usize;
            let glyph = match (second, mark) {
                (true, _) if self.occupied[index] => Graph::OVERLAP,
                (_, Mark::Connector) => View::VERTICAL,
                (false, Mark::Point) => Graph::POINT_A,
                (true, Mark::Point) => Graph::POINT_B,
            };
            if !second {
                self.occupied[index] = true;
            }
            view.put(x + 1, y + 1, glyph, series.style);
        }
    }

    /// returns the cells occupied by a sequence of rows, one per column.
    ///
    /// when two neighboring samples lie on different rows, the cells strictly between them in
    /// the later sample's column are filled by a connector.
    fn rasterize(rows: &[u16]) -> Vec<(u16, u16, Mark)> {
        let mut cells = Vec::with_capacity(rows.len());
        let mut previous = None;

        for (x, &y) in (0..).zip(rows) {
            cells.push((x, y, Mark::Point));
            if let Some(prev) = previous {
                let (low, high) = if prev < y { (prev, y) } else { (y, prev) };
                cells.extend((low + 1..high).map(|between| (x, between, Mark::Connector)));
            }
            previous = Some(y);
        }

        cells
    }
}
