//! reads the host's resource counters.
//!
//! each reading is a single query against a [`StatsSource`] that either yields a value or
//! reports that it is not available. a reading that is not available this tick is simply absent
//! from the [`Snapshot`]; it will be tried again on the next tick.

use {
    crate::{
        config::Config,
        source::{Clock, StatsSource},
        stat::{self, CpuTime, StatReadError},
    },
    std::{fmt, io, time::Instant},
    tracing::debug,
};

pub use self::{
    disk::DiskCounters,
    memory::MemInfo,
    net::NetCounters,
    process::{Pid, ProcessSample},
    system::{FsUsage, LoadAvg},
};

mod disk;
mod memory;
mod net;
mod process;
mod system;


/// the raw counters observed at a moment in time.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub time: Instant,
    pub cpu: Option<CpuTime>,
    pub memory: Option<MemInfo>,
    pub load: Option<LoadAvg>,
    /// seconds since boot.
    pub uptime: Option<f64>,
    /// degrees celsius.
    pub temperature: Option<f64>,
    pub throttled: Option<u32>,
    pub net: Option<NetCounters>,
    pub disk: Option<DiskCounters>,
    pub fs: Option<FsUsage>,
    pub processes: Vec<ProcessSample>,
}

/// the network interface and block device being monitored.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Devices {
    pub iface: Option<String>,
    pub disk: Option<String>,
}

#[derive(Debug)]
pub enum ProbeError {
    Io(io::Error),
    Stat(StatReadError),
    /// the contents of a pseudo-file could not be understood.
    Malformed { what: &'static str },
    /// the requested device or entry does not exist.
    NotFound { what: &'static str },
}

// === impl Snapshot ===

impl Snapshot {
    /// reads every counter from the given source.
    pub fn read(source: &impl StatsSource, clock: &impl Clock, devices: &Devices) -> Self {
        let time = clock.now();
        let Devices { iface, disk } = devices;

        Snapshot {
            time,
            cpu: available("cpu", stat::read(source).map_err(ProbeError::Stat)),
            memory: available("memory", memory::read(source)),
            load: available("load", system::read_load(source)),
            uptime: available("uptime", system::read_uptime(source)),
            temperature: available("temperature", system::read_temperature(source)),
            throttled: available("throttling", system::read_throttled(source)),
            net: iface
                .as_deref()
                .and_then(|iface| available("network", net::read(source, iface))),
            disk: disk
                .as_deref()
                .and_then(|disk| available("disk", disk::read(source, disk))),
            fs: available("filesystem", system::read_fs_usage(source)),
            processes: process::scan(source),
        }
    }
}

/// discards an unavailable reading, noting why.
fn available<T>(what: &'static str, reading: Result<T, ProbeError>) -> Option<T> {
    reading
        .inspect_err(|error| debug!(%error, "{what} is not available"))
        .ok()
}

// === impl Devices ===

impl Devices {
    /// selects the devices to monitor.
    ///
    /// devices named by the configuration take precedence. otherwise, the first non-loopback
    /// interface and the highest-ranked block device are chosen.
    pub fn select(config: &Config, source: &impl StatsSource) -> Self {
        let iface = config
            .iface
            .clone()
            .or_else(|| available("network interface", net::choose(source)));
        let disk = config
            .disk
            .clone()
            .or_else(|| available("block device", disk::choose(source)));

        Self { iface, disk }
    }
}

// === impl ProbeError ===

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(io) => Some(io),
            Self::Stat(stat) => Some(stat),
            Self::Malformed { .. } | Self::NotFound { .. } => None,
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(io) => f.write_fmt(format_args!("{}", io)),
            Self::Stat(stat) => f.write_fmt(format_args!("{}", stat)),
            Self::Malformed { what } => f.write_fmt(format_args!("malformed {what}")),
            Self::NotFound { what } => f.write_fmt(format_args!("no {what} found")),
        }
    }
}

impl From<io::Error> for ProbeError {
    fn from(io: io::Error) -> Self {
        Self::Io(io)
    }
}
