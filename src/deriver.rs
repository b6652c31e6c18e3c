//! turns successive counter snapshots into rates and percentages.
//!
//! the kernel reports most quantities as cumulative counters. a [`MetricDeriver`] keeps the
//! previous reading of each counter, and reports how quickly it grew since then.

use {
    crate::{
        probe::{DiskCounters, FsUsage, LoadAvg, MemInfo, NetCounters, ProcessSample, Snapshot},
        stat::{CpuTime, Measurement},
    },
    std::time::Instant,
};


/// the shortest span of time, in seconds, that a rate is computed over.
pub const EPSILON: f64 = 0.001;

/// the size of a disk sector, as counted by `/proc/diskstats`.
const SECTOR_BYTES: f64 = 512.0;

const MEGABYTE: f64 = 1024.0 * 1024.0;

/// the unit a derived metric is reported in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Unit {
    Percent,
    MegabytesPerSecond,
    Celsius,
}

/// a stream of derived metrics, each of which is retained in its own history.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stream {
    Cpu,
    Memory,
    Temperature,
    DiskRead,
    DiskWrite,
    NetRx,
    NetTx,
}

/// a named, unit-tagged value computed for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedMetric {
    pub stream: Stream,
    pub value: f64,
}

/// everything derived from one tick's snapshot.
#[derive(Clone, Debug, Default)]
pub struct Recording {
    /// seconds since the previous tick.
    pub elapsed: f64,
    /// percentage of non-idle cpu time.
    pub cpu: f64,
    /// percentage of memory in use.
    pub memory: f64,
    /// degrees celsius, if a sensor is present.
    pub temperature: Option<f64>,
    pub load: Option<LoadAvg>,
    /// seconds since boot.
    pub uptime: Option<f64>,
    pub disk: DiskRates,
    pub net: NetRates,
    pub fs: Option<FsUsage>,
    /// the power/throttling flag bitmask.
    pub throttled: Option<u32>,
    pub processes: Vec<ProcessSample>,
}

/// disk throughput, in megabytes per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DiskRates {
    pub read: f64,
    pub write: f64,
}

/// network throughput in megabytes per second, and faults counted since the previous tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NetRates {
    pub rx: f64,
    pub tx: f64,
    pub rx_errors: u64,
    pub rx_drops: u64,
    pub tx_errors: u64,
    pub tx_drops: u64,
}

/// a monotonically increasing counter, and when it was last read.
#[derive(Debug, Default)]
pub struct Counter {
    last: Option<(u64, Instant)>,
}

/// derives metrics from successive snapshots.
#[derive(Debug, Default)]
pub struct MetricDeriver {
    last_tick: Option<Instant>,
    cpu: Option<CpuTime>,
    disk_read: Counter,
    disk_write: Counter,
    net_rx: Counter,
    net_tx: Counter,
    rx_errors: Counter,
    rx_drops: Counter,
    tx_errors: Counter,
    tx_drops: Counter,
}

/// returns the seconds between two instants, never less than [`EPSILON`].
pub fn seconds_between(earlier: Instant, later: Instant) -> f64 {
    later
        .saturating_duration_since(earlier)
        .as_secs_f64()
        .max(EPSILON)
}

/// returns the percentage of memory in use.
pub fn memory_percent(MemInfo { total, available }: MemInfo) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let used = total.saturating_sub(available);
    used as f64 / total as f64 * 100.0
}

// === impl Unit ===

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::MegabytesPerSecond => "MB/s",
            Self::Celsius => "C",
        }
    }
}

// === impl Stream ===

impl Stream {
    pub const ALL: [Self; 7] = [
        Self::Cpu,
        Self::Memory,
        Self::Temperature,
        Self::DiskRead,
        Self::DiskWrite,
        Self::NetRx,
        Self::NetTx,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Memory => "mem",
            Self::Temperature => "temp",
            Self::DiskRead => "disk-read",
            Self::DiskWrite => "disk-write",
            Self::NetRx => "net-rx",
            Self::NetTx => "net-tx",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Self::Cpu | Self::Memory => Unit::Percent,
            Self::Temperature => Unit::Celsius,
            Self::DiskRead | Self::DiskWrite | Self::NetRx | Self::NetTx => {
                Unit::MegabytesPerSecond
            }
        }
    }
}

// === impl Recording ===

impl Recording {
    /// returns this tick's value for each stream.
    ///
    /// a missing temperature reading is reported as zero.
    pub fn metrics(&self) -> [DerivedMetric; 7] {
        Stream::ALL.map(|stream| {
            let value = match stream {
                Stream::Cpu => self.cpu,
                Stream::Memory => self.memory,
                Stream::Temperature => self.temperature.unwrap_or(0.0),
                Stream::DiskRead => self.disk.read,
                Stream::DiskWrite => self.disk.write,
                Stream::NetRx => self.net.rx,
                Stream::NetTx => self.net.tx,
            };
            DerivedMetric { stream, value }
        })
    }
}

// === impl Counter ===

impl Counter {
    /// records a new reading, returning its growth and the seconds elapsed since the last one.
    ///
    /// returns `None` for the first reading. a counter that went backwards, because it wrapped
    /// or its device was replaced, has grown by zero.
    pub fn advance(&mut self, value: u64, time: Instant) -> Option<(u64, f64)> {
        let (last, then) = self.last.replace((value, time))?;
        Some((value.saturating_sub(last), seconds_between(then, time)))
    }

    /// records a new reading, returning its growth since the last one.
    pub fn delta(&mut self, value: u64, time: Instant) -> u64 {
        self.advance(value, time).map_or(0, |(delta, _)| delta)
    }

    /// records a new reading, returning its growth per second.
    pub fn rate(&mut self, value: u64, time: Instant) -> f64 {
        self.advance(value, time)
            .map_or(0.0, |(delta, dt)| delta as f64 / dt)
    }
}

// === impl MetricDeriver ===

impl MetricDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// derives this tick's metrics from a snapshot.
    ///
    /// quantities missing from the snapshot are reported as zero, and their counters keep their
    /// previous reading.
    pub fn derive(&mut self, snapshot: Snapshot) -> Recording {
        let Snapshot {
            time,
            cpu,
            memory,
            load,
            uptime,
            temperature,
            throttled,
            net,
            disk,
            fs,
            processes,
        } = snapshot;

        let elapsed = self
            .last_tick
            .replace(time)
            .map_or(EPSILON, |last| seconds_between(last, time));

        Recording {
            elapsed,
            cpu: cpu.map_or(0.0, |cpu| self.cpu(cpu)),
            memory: memory.map_or(0.0, memory_percent),
            temperature,
            load,
            uptime,
            disk: disk.map_or_else(DiskRates::default, |disk| self.disk(disk, time)),
            net: net.map_or_else(NetRates::default, |net| self.net(net, time)),
            fs,
            throttled,
            processes,
        }
    }

    fn cpu(&mut self, time: CpuTime) -> f64 {
        let measurement = self.cpu.as_ref().map(|last| Measurement::new(last, &time));
        self.cpu = Some(time);
        measurement.map_or(0.0, |m| m.percentage())
    }

    fn disk(&mut self, counters: DiskCounters, time: Instant) -> DiskRates {
        let DiskCounters {
            sectors_read,
            sectors_written,
        } = counters;
        let to_mbs = |sectors_per_sec: f64| sectors_per_sec * SECTOR_BYTES / MEGABYTE;

        DiskRates {
            read: to_mbs(self.disk_read.rate(sectors_read, time)),
            write: to_mbs(self.disk_write.rate(sectors_written, time)),
        }
    }

    fn net(&mut self, counters: NetCounters, time: Instant) -> NetRates {
        let NetCounters {
            rx_bytes,
            tx_bytes,
            rx_errors,
            rx_drops,
            tx_errors,
            tx_drops,
        } = counters;

        NetRates {
            rx: self.net_rx.rate(rx_bytes, time) / MEGABYTE,
            tx: self.net_tx.rate(tx_bytes, time) / MEGABYTE,
            rx_errors: self.rx_errors.delta(rx_errors, time),
            rx_drops: self.rx_drops.delta(rx_drops, time),
            tx_errors: self.tx_errors.delta(tx_errors, time),
            tx_drops: self.tx_drops.delta(tx_drops, time),
        }
    }
}
