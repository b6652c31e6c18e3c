//! environment configuration.

use {std::path::PathBuf, tracing::Level};


/// settings read from the environment.
///
/// empty variables are treated as unset.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// `IFACE`: the network interface to monitor.
    pub iface: Option<String>,
    /// `DISK`: the block device to monitor, such as `sda` or `nvme0n1`.
    pub disk: Option<String>,
    /// `SPARTA_LOG`: a file to write logs to. nothing is logged otherwise, since the terminal
    /// belongs to the dashboard.
    pub log: Option<PathBuf>,
    /// `SPARTA_LOG_LEVEL`: one of `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: Level,
}

// === impl Config ===

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            iface: var("IFACE"),
            disk: var("DISK"),
            log: var("SPARTA_LOG").map(PathBuf::from),
            log_level: var("SPARTA_LOG_LEVEL")
                .and_then(|level| level.trim().parse().ok())
                .unwrap_or(Level::INFO),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
