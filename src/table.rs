//! the task list pane.

use crate::{
    format,
    frame::{Style, View},
    tasks::ProcessRecord,
};


/// a scrollable list of processes, busiest first.
pub struct TaskTable<'a> {
    /// the processes to list, in order.
    pub ranked: &'a [&'a ProcessRecord],
    /// the number of rows scrolled past.
    pub scroll: usize,
    pub text: Style,
    /// the style of processes using most of a core.
    pub hot: Style,
}

// === impl TaskTable ===

impl TaskTable<'_> {
    /// processes using at least this much of a core are highlighted.
    pub const HOT: f64 = 80.0;

    const TITLE: &'static str = " TASKS (avg CPU) ";
    const HEADER: &'static str = "PID    AVG  CUR   RSS     S CMD";
    /// the columns preceding the command name, and the borders around the table.
    const FIXED_COLUMNS: u16 = 30;

    /// returns the number of processes listed by a pane of the given height.
    ///
    /// the border, column headings and footer take up the remaining rows.
    pub fn visible_rows(height: u16) -> usize {
        height.saturating_sub(4) as usize
    }

    /// returns the furthest a list of `tasks` can be scrolled in a pane of the given height.
    pub fn max_scroll(tasks: usize, height: u16) -> usize {
        tasks.saturating_sub(Self::visible_rows(height))
    }

    pub fn render(&self, view: &mut View<'_>) {
        let Self {
            ranked,
            scroll,
            text,
            hot,
        } = self;

        view.boxed(Style::PLAIN);
        view.print(2, 0, Self::TITLE, Style::PLAIN.bold());

        let (width, height) = (view.width(), view.height());
        if height < 4 {
            return;
        }
        view.print(2, 1, Self::HEADER, text.bold());

        let max_scroll = Self::max_scroll(ranked.len(), height);
        let scroll = (*scroll).min(max_scroll);
        let name_width = width.saturating_sub(Self::FIXED_COLUMNS) as usize;

        let rows = ranked
            .iter()
            .skip(scroll)
            .take(Self::visible_rows(height));
        for (y, record) in (2..).zip(rows) {
            let ProcessRecord {
                pid,
                name,
                state,
                instant,
                average,
                rss_bytes,
                ..
            } = record;

            let line = format!(
                "{pid:<6} {average:>4.1} {instant:>4.1} {:<7} {state} {}",
                format::bytes(*rss_bytes),
                format::truncate(name, name_width),
            );
            let style = if *instant >= Self::HOT { hot } else { text };
            view.print(2, y, &line, *style);
        }

        let footer = format!(
            "tasks:{} scroll:{scroll}/{max_scroll}  (100%=1 core)",
            ranked.len()
        );
        view.print(2, height - 2, &footer, text.dim());
    }
}
