//! a full-screen host monitor for the terminal.

use {
    self::sentinel::Sentinel,
    std::{fmt::Display, io},
};

pub use self::config::Config;

/// environment configuration.
mod config;

/// the dashboard's state, and how it is drawn.
mod dashboard;

/// turning counters into rates.
mod deriver;

/// human-readable values.
mod format;

/// an in-memory grid of styled cells.
mod frame;

/// time-series graph panes.
mod graph;

/// fixed-capacity sample histories.
mod history;

/// keyboard commands.
mod input;

/// dividing the screen into panes.
mod layout;

/// reading raw samples from the kernel.
mod probe;

/// observes the system once per tick.
mod sentinel;

/// where kernel statistics are read from.
mod source;

/// kernel statistics facilities.
///
/// this file provides tools to interact with `/proc/stat`.
mod stat;

/// the task list pane.
mod table;

/// per-process cpu accounting.
mod tasks;

/// drawing to the terminal.
mod window;

pub struct App {
    sentinel: Sentinel,
}

#[derive(Debug)]
pub enum Error {
    /// the terminal could not be set up, drawn to, or restored.
    Terminal(io::Error),
}

/// === impl App ===

impl App {
    /// initializes a new application.
    pub fn new(config: &Config) -> Self {
        Self {
            sentinel: Sentinel::new(config),
        }
    }
}

// === impl Error ===

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Terminal(io) => Some(io),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminal(io) => f.write_fmt(format_args!("terminal error: {}", io)),
        }
    }
}

impl From<io::Error> for Error {
    fn from(io: io::Error) -> Self {
        Self::Terminal(io)
    }
}
