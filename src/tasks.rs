//! per-process cpu and memory tracking.
//!
//! each tick follows the same pattern: [`ProcessTable::begin_tick()`] clears every record's
//! "seen" mark, [`ProcessTable::observe()`] is called for each running process, and
//! [`ProcessTable::end_tick()`] sweeps away the records of processes that have exited.

use {
    crate::{deriver::EPSILON, probe::Pid},
    std::{cmp::Ordering, collections::HashMap},
};

#[cfg(test)]
mod tests;

/// a smoothed average below this has not yet been seeded with a reading.
const UNSEEDED: f64 = 0.0001;

/// the processes running on the system.
#[derive(Debug)]
pub struct ProcessTable {
    /// the tracked processes.
    records: Vec<ProcessRecord>,
    /// each tracked pid's position in `records`.
    index: HashMap<Pid, usize>,
    /// the number of clock ticks in a second.
    clock_ticks: f64,
    /// seconds elapsed since the previous tick.
    elapsed: f64,
}

/// a process, as tracked across ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRecord {
    pub pid: Pid,
    pub name: String,
    /// the single-character state code.
    pub state: char,
    /// cumulative cpu time at the last observation, in clock ticks.
    cpu_time: u64,
    /// cpu usage during the current tick, as a percentage of one core.
    pub instant: f64,
    /// exponentially smoothed cpu usage.
    pub average: f64,
    /// resident memory, in bytes.
    pub rss_bytes: u64,
    /// whether this process was observed during the current tick.
    seen: bool,
}

// === impl ProcessTable ===

impl ProcessTable {
    /// the weight given to each new reading by the smoothed average.
    pub const ALPHA: f64 = 0.20;

    pub fn new(clock_ticks: u64) -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            clock_ticks: clock_ticks.max(1) as f64,
            elapsed: EPSILON,
        }
    }

    /// begins a tick, `elapsed` seconds after the previous one.
    pub fn begin_tick(&mut self, elapsed: f64) {
        self.elapsed = if elapsed > EPSILON { elapsed } else { EPSILON };
        self.records.iter_mut().for_each(|r| r.seen = false);
    }

    /// records an observation of a running process.
    pub fn observe(&mut self, pid: Pid, name: &str, state: char, cpu_time: u64, rss_bytes: u64) {
        let Self {
            records,
            index,
            clock_ticks,
            elapsed,
        } = self;

        let Some(record) = index.get(&pid).and_then(|i| records.get_mut(*i)) else {
            // a newly discovered process has no prior cpu time to compare against.
            index.insert(pid, records.len());
            records.push(ProcessRecord {
                pid,
                name: name.to_owned(),
                state,
                cpu_time,
                instant: 0.0,
                average: 0.0,
                rss_bytes,
                seen: true,
            });
            return;
        };

        let ticks = cpu_time.saturating_sub(record.cpu_time);
        let instant = ticks as f64 * 100.0 / (*clock_ticks * *elapsed);

        if record.name != name {
            record.name = name.to_owned();
        }
        record.state = state;
        record.cpu_time = cpu_time;
        record.rss_bytes = rss_bytes;
        record.seen = true;
        record.smooth(instant);
    }

    /// ends a tick, forgetting every process that was not observed since it began.
    pub fn end_tick(&mut self) {
        let Self { records, index, .. } = self;

        records.retain(|r| r.seen);
        index.clear();
        index.extend(records.iter().enumerate().map(|(i, r)| (r.pid, i)));
    }

    /// returns the processes, busiest first.
    ///
    /// processes are ordered by their smoothed cpu usage, then by their current usage, then by
    /// pid.
    pub fn ranked(&self) -> Vec<&ProcessRecord> {
        let mut ranked = self.records.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| ProcessRecord::rank(a, b));
        ranked
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessRecord> {
        self.index.get(&pid).and_then(|i| self.records.get(*i))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// === impl ProcessRecord ===

impl ProcessRecord {
    /// folds a new cpu reading into the smoothed average.
    ///
    /// an unseeded average adopts the reading outright, so that a process does not appear to
    /// ramp up from zero when it is first discovered.
    fn smooth(&mut self, instant: f64) {
        const ALPHA: f64 = ProcessTable::ALPHA;

        self.instant = instant;
        self.average = if self.average <= UNSEEDED {
            instant
        } else {
            (1.0 - ALPHA) * self.average + ALPHA * instant
        };
    }

    fn rank(a: &Self, b: &Self) -> Ordering {
        b.average
            .total_cmp(&a.average)
            .then_with(|| b.instant.total_cmp(&a.instant))
            .then_with(|| a.pid.cmp(&b.pid))
    }
}
