use {
    super::ProbeError,
    crate::source::StatsSource,
    std::path::{Path, PathBuf},
    tracing::trace,
};

const PROC: &str = "/proc";

/// a process id.
pub type Pid = u32;

/// one process, as observed during a tick.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProcessSample {
    pub pid: Pid,
    pub name: String,
    /// the single-character state code, such as `R` or `S`.
    pub state: char,
    /// cumulative user and system time, in clock ticks.
    pub cpu_time: u64,
    /// resident memory, in bytes.
    pub rss_bytes: u64,
}

/// the fields of `/proc/<pid>/stat` this monitor uses.
#[derive(Debug, PartialEq)]
pub(super) struct ProcStat {
    pub name: String,
    pub state: char,
    pub cpu_time: u64,
}

/// observes every running process.
///
/// processes that exit while the table is being read are skipped.
pub(super) fn scan(source: &impl StatsSource) -> Vec<ProcessSample> {
    let entries = match source.list(Path::new(PROC)) {
        Ok(entries) => entries,
        Err(error) => {
            trace!(%error, "process list is not available");
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|name| name.parse::<Pid>().ok())
        .filter_map(|pid| read(source, pid).ok())
        .collect()
}

fn read(source: &impl StatsSource, pid: Pid) -> Result<ProcessSample, ProbeError> {
    let dir = PathBuf::from(PROC).join(pid.to_string());
    let ProcStat {
        name,
        state,
        cpu_time,
    } = parse_stat(&source.read_to_string(&dir.join("stat"))?)?;

    let rss_bytes = source
        .read_to_string(&dir.join("statm"))
        .ok()
        .and_then(|statm| parse_statm(&statm))
        .map_or(0, |pages| pages.saturating_mul(source.page_size()));

    Ok(ProcessSample {
        pid,
        name,
        state,
        cpu_time,
        rss_bytes,
    })
}

/// parses `/proc/<pid>/stat`.
///
/// the command name is wrapped in parentheses and may itself contain spaces or parentheses, so
/// it extends to the last closing parenthesis.
pub(super) fn parse_stat(contents: &str) -> Result<ProcStat, ProbeError> {
    let malformed = || ProbeError::Malformed { what: "pid stat" };

    let open = contents.find('(').ok_or_else(malformed)?;
    let close = contents.rfind(')').filter(|c| *c > open).ok_or_else(malformed)?;
    let name = contents[open + 1..close].to_owned();

    // the fields following the name, starting with the state (field 3 in `proc_pid_stat(5)`).
    let fields = contents[close + 1..].split_whitespace().collect::<Vec<_>>();
    let [state, _ppid, _pgrp, _session, _tty, _tpgid, _flags, _minflt, _cminflt, _majflt, _cmajflt, utime, stime, ..] =
        fields.as_slice()
    else {
        return Err(malformed());
    };

    let state = state.chars().next().ok_or_else(malformed)?;
    let utime = utime.parse::<u64>().map_err(|_| malformed())?;
    let stime = stime.parse::<u64>().map_err(|_| malformed())?;

    Ok(ProcStat {
        name,
        state,
        cpu_time: utime.saturating_add(stime),
    })
}

/// returns the resident set size, in pages, from `/proc/<pid>/statm`.
pub(super) fn parse_statm(contents: &str) -> Option<u64> {
    contents.split_whitespace().nth(1)?.parse().ok()
}
