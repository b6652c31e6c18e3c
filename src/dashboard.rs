//! the dashboard's state, and how it is drawn.
//!
//! a [`Dashboard`] holds everything shown on screen: the history of each metric, the process
//! table, the layout, and the user's settings. it knows nothing about the terminal; each tick
//! it is handed a [`Recording`] and any pending [`Command`]s, and draws itself into a
//! [`Frame`].

use {
    crate::{
        deriver::{Recording, Stream, Unit},
        format::{self, NOT_AVAILABLE},
        frame::{Frame, Style, View},
        graph::{Domain, Graph, Plot, Series},
        history::RingHistory,
        input::Command,
        layout::{LayoutEngine, PaneId},
        probe::Devices,
        table::TaskTable,
        tasks::ProcessTable,
    },
    crossterm::style::Color,
    std::time::Duration,
    tracing::debug,
};

#[cfg(test)]
mod tests;

/// where the dashboard is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    Running,
    /// the terminal was resized, and the panes must be laid out again.
    Relayout,
    /// the user asked to quit.
    Stopped,
}

/// the terminal dashboard.
#[derive(Debug)]
pub struct Dashboard {
    state: State,
    histories: Histories,
    tasks: ProcessTable,
    layout: LayoutEngine,
    frame: Frame,
    /// how long to wait between ticks.
    interval: Duration,
    /// rows of the task list scrolled past.
    scroll: usize,
    /// whether to draw in color.
    color: bool,
    /// the most recent tick's metrics.
    latest: Recording,
    /// the devices being monitored.
    devices: Devices,
}

/// a history of each metric.
#[derive(Debug, Default)]
struct Histories([RingHistory<f64>; Stream::ALL.len()]);

/// the styles the dashboard is drawn with.
struct Palette {
    color: bool,
}

// === impl Dashboard ===

impl Dashboard {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
    pub const MIN_INTERVAL: Duration = Duration::from_millis(100);
    pub const MAX_INTERVAL: Duration = Duration::from_millis(2000);
    /// how much each key press changes the interval by.
    pub const INTERVAL_STEP: Duration = Duration::from_millis(50);

    /// temperatures at or above this are drawn in red.
    const HOT_TEMPERATURE: f64 = 80.0;

    pub fn new(width: u16, height: u16, clock_ticks: u64, devices: Devices) -> Self {
        Self {
            state: State::Running,
            histories: Histories::default(),
            tasks: ProcessTable::new(clock_ticks),
            layout: LayoutEngine::new(width, height),
            frame: Frame::new(width, height),
            interval: Self::DEFAULT_INTERVAL,
            scroll: 0,
            color: true,
            latest: Recording::default(),
            devices,
        }
    }

    #[allow(dead_code, reason = "inspected by tests.")]
    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != State::Stopped
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[allow(dead_code, reason = "inspected by tests.")]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    #[allow(dead_code, reason = "inspected by tests.")]
    pub fn color(&self) -> bool {
        self.color
    }

    #[allow(dead_code, reason = "inspected by tests.")]
    pub fn history(&self, stream: Stream) -> &RingHistory<f64> {
        self.histories.get(stream)
    }

    #[allow(dead_code, reason = "inspected by tests.")]
    pub fn tasks(&self) -> &ProcessTable {
        &self.tasks
    }

    /// notes that the terminal was resized.
    pub fn resized(&mut self) {
        if self.state == State::Running {
            self.state = State::Relayout;
        }
    }

    /// lays the panes out again if the terminal was resized, or its size has changed.
    ///
    /// returns `true` if the panes were laid out again, which resets the task list's scroll
    /// position.
    pub fn relayout(&mut self, width: u16, height: u16) -> bool {
        let resized = self.state == State::Relayout;
        if resized {
            self.state = State::Running;
        }

        if !self.layout.update(width, height, resized) {
            return false;
        }

        debug!(width, height, "laying out panes");
        self.frame.resize(width, height);
        self.scroll = 0;
        true
    }

    /// carries out a command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Quit => self.stop(),
            Command::Faster => self.set_interval(
                self.interval
                    .saturating_sub(Self::INTERVAL_STEP)
                    .max(Self::MIN_INTERVAL),
            ),
            Command::Slower => self.set_interval(
                self.interval
                    .saturating_add(Self::INTERVAL_STEP)
                    .min(Self::MAX_INTERVAL),
            ),
            Command::ToggleColor => self.color = !self.color,
            Command::Scroll(rows) => {
                let scroll = self.scroll.saturating_add_signed(rows);
                self.scroll = scroll.min(self.max_scroll());
            }
            Command::ScrollTop => self.scroll = 0,
        }
    }

    pub fn stop(&mut self) {
        self.state = State::Stopped;
    }

    /// records a tick's metrics.
    pub fn ingest(&mut self, recording: Recording) {
        let Self {
            histories, tasks, ..
        } = self;

        for metric in recording.metrics() {
            histories.push(metric.stream, metric.value);
        }

        tasks.begin_tick(recording.elapsed);
        for process in &recording.processes {
            tasks.observe(
                process.pid,
                &process.name,
                process.state,
                process.cpu_time,
                process.rss_bytes,
            );
        }
        tasks.end_tick();

        self.scroll = self.scroll.min(self.max_scroll());
        self.latest = recording;
    }

    /// draws the dashboard, returning the finished frame.
    pub fn draw(&mut self) -> &Frame {
        let Self {
            histories,
            tasks,
            layout,
            frame,
            interval,
            scroll,
            color,
            latest,
            devices,
            ..
        } = self;

        let palette = Palette { color: *color };
        let layout = layout.layout();
        frame.clear();

        let header = Self::header(latest, devices, *interval);
        Self::draw_header(&mut frame.view(layout.header()), &header, &palette);

        for (pane, region) in layout.panes() {
            let mut view = frame.view(region);
            match pane {
                PaneId::Tasks => {
                    let ranked = tasks.ranked();
                    TaskTable {
                        ranked: &ranked,
                        scroll: *scroll,
                        text: palette.paint(Color::White),
                        hot: palette.emphasize(Color::Red),
                    }
                    .render(&mut view);
                }
                PaneId::Disk => {
                    let extra = format!("R/W MB/s (dev: {})", or_na(devices.disk.as_deref()));
                    Self::draw_rates(&mut view, histories, &palette, Rates::Disk, &extra);
                }
                PaneId::Net => {
                    let net = &latest.net;
                    let extra = format!(
                        "errs/drops Δ rx {}/{} tx {}/{} (if: {})",
                        net.rx_errors,
                        net.rx_drops,
                        net.tx_errors,
                        net.tx_drops,
                        or_na(devices.iface.as_deref())
                    );
                    Self::draw_rates(&mut view, histories, &palette, Rates::Net, &extra);
                }
                PaneId::Cpu => Graph {
                    title: "CPU % (time)",
                    unit: Stream::Cpu.unit().suffix(),
                    domain: Domain::PERCENT,
                    plot: Plot::Single(Series {
                        label: Stream::Cpu.name(),
                        history: histories.get(Stream::Cpu),
                        style: palette.paint(Color::Cyan),
                    }),
                    extra: None,
                }
                .render(&mut view),
                PaneId::Mem => Graph {
                    title: "MEM % (time)",
                    unit: Stream::Memory.unit().suffix(),
                    domain: Domain::PERCENT,
                    plot: Plot::Single(Series {
                        label: Stream::Memory.name(),
                        history: histories.get(Stream::Memory),
                        style: palette.paint(Color::Green),
                    }),
                    extra: None,
                }
                .render(&mut view),
                PaneId::Temp => {
                    let history = histories.get(Stream::Temperature);
                    let hot = latest
                        .temperature
                        .is_some_and(|celsius| celsius >= Self::HOT_TEMPERATURE);
                    Graph {
                        title: "TEMP C (time)",
                        unit: Stream::Temperature.unit().suffix(),
                        domain: temperature_domain(latest.temperature),
                        plot: Plot::Single(Series {
                            label: Stream::Temperature.name(),
                            history,
                            style: palette.paint(if hot { Color::Red } else { Color::Yellow }),
                        }),
                        extra: None,
                    }
                    .render(&mut view)
                }
            }
        }

        frame
    }

    /// returns the two lines of the header.
    fn header(latest: &Recording, devices: &Devices, interval: Duration) -> [String; 2] {
        let Recording {
            cpu,
            memory,
            temperature,
            load,
            uptime,
            fs,
            throttled,
            ..
        } = latest;

        let keys = format!(
            "q quit | +/- speed | arrows scroll | c color | {}ms",
            interval.as_millis()
        );

        let load = load.map_or_else(
            || NOT_AVAILABLE.to_owned(),
            |load| format!("{:.2} {:.2} {:.2}", load.one, load.five, load.fifteen),
        );
        let temperature = temperature.map_or_else(
            || NOT_AVAILABLE.to_owned(),
            |c| format!("{c:.1}{}", Unit::Celsius.suffix()),
        );
        let fs = fs.map_or_else(
            || format!("FS / {NOT_AVAILABLE}"),
            |fs| {
                format!(
                    "FS / {:.1}% ({}/{}) INO {:.1}%",
                    fs.used_percent,
                    format::bytes(fs.used_bytes),
                    format::bytes(fs.total_bytes),
                    fs.inode_percent
                )
            },
        );
        let uptime = uptime.map_or_else(|| NOT_AVAILABLE.to_owned(), format::uptime);
        let summary = format!(
            "CPU {cpu:.1}% MEM {memory:.1}% LOAD {load} TEMP {temperature}  {fs}  {}  IF {} DK {}  \
             UP {uptime}",
            format::throttle(*throttled),
            or_na(devices.iface.as_deref()),
            or_na(devices.disk.as_deref()),
        );

        [keys, summary]
    }

    fn draw_header(view: &mut View<'_>, [keys, summary]: &[String; 2], palette: &Palette) {
        const NAME: &str = "SPARTA//MON";

        let width = view.width().saturating_sub(4) as usize;
        let text = palette.paint(Color::White);
        view.print(2, 0, NAME, palette.emphasize(Color::Magenta));
        view.print(16, 0, keys, text);
        view.print(2, 1, format::truncate(summary, width), text);
    }

    fn draw_rates(
        view: &mut View<'_>,
        histories: &Histories,
        palette: &Palette,
        rates: Rates,
        extra: &str,
    ) {
        let (title, [a, b], [label_a, label_b]) = match rates {
            Rates::Disk => (
                "DISK I/O (time)",
                [Stream::DiskRead, Stream::DiskWrite],
                ["RD", "WR"],
            ),
            Rates::Net => (
                "NET I/O (time)",
                [Stream::NetRx, Stream::NetTx],
                ["RX", "TX"],
            ),
        };
        let unit = a.unit().suffix();
        let (a, b) = (histories.get(a), histories.get(b));

        Graph {
            title,
            unit,
            domain: rate_domain(a.latest(), b.latest()),
            plot: Plot::Dual(
                Series {
                    label: label_a,
                    history: a,
                    style: palette.paint(Color::Cyan),
                },
                Series {
                    label: label_b,
                    history: b,
                    style: palette.paint(Color::Magenta),
                },
            ),
            extra: Some(extra),
        }
        .render(view);
    }

    fn set_interval(&mut self, interval: Duration) {
        if interval != self.interval {
            debug!(interval_ms = interval.as_millis() as u64, "changing refresh interval");
            self.interval = interval;
        }
    }

    /// the furthest the task list can be scrolled.
    fn max_scroll(&self) -> usize {
        let height = self.layout.layout().pane(PaneId::Tasks).height;
        TaskTable::max_scroll(self.tasks.len(), height)
    }
}

/// the pair of throughput graphs.
#[derive(Clone, Copy)]
enum Rates {
    Disk,
    Net,
}

/// returns the domain of the temperature graph.
///
/// the graph spans 20 to 90 degrees, widened to keep the latest reading at least 10 degrees
/// from either edge.
pub fn temperature_domain(latest: Option<f64>) -> Domain {
    const MARGIN: f64 = 10.0;

    let (min, max) = (20.0, 90.0);
    match latest {
        Some(celsius) => Domain::new(
            (celsius - MARGIN).min(min).max(0.0),
            (celsius + MARGIN).max(max),
        ),
        None => Domain::new(min, max),
    }
}

/// returns the domain of a throughput graph, leaving headroom above the latest readings.
pub fn rate_domain(a: f64, b: f64) -> Domain {
    Domain::new(0.0, (a.max(b) * 1.5).max(1.0))
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

// === impl Histories ===

impl Histories {
    fn get(&self, stream: Stream) -> &RingHistory<f64> {
        &self.0[stream as usize]
    }

    fn push(&mut self, stream: Stream, value: f64) {
        self.0[stream as usize].push(value);
    }
}

// === impl Palette ===

impl Palette {
    fn paint(&self, color: Color) -> Style {
        if self.color { Style::fg(color) } else { Style::PLAIN }
    }

    /// paints in bold, when drawing in color.
    fn emphasize(&self, color: Color) -> Style {
        if self.color { Style::fg(color).bold() } else { Style::PLAIN }
    }
}
