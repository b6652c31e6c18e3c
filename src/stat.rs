use {
    crate::source::StatsSource,
    std::{
        fmt::{self, Display},
        io::{self, BufRead, BufReader},
        path::Path,
        str::FromStr,
    },
};

pub use self::{
    cpu_time::{CpuTime, Measurement},
    user_hz::UserHz,
};

mod cpu_time;
mod user_hz;


#[derive(Debug, Eq, PartialEq)]
pub enum EntryParseError {
    Empty,
    UserHzParse(<UserHz as FromStr>::Err),
    CpuTime,
}

#[derive(Debug)]
pub enum StatReadError {
    Io(io::Error),
    Entry(EntryParseError),
    /// the table had no aggregate "cpu" line.
    Missing,
}

/// the kernel statistics table.
const STAT: &str = "/proc/stat";

/// the kind of the entry counting every cpu's time together.
const AGGREGATE: &str = "cpu";

/// reads the time that all cpus, in aggregate, have spent in various states.
///
/// see `proc_stat(5)` for more information.
pub fn read(stats: &impl StatsSource) -> Result<CpuTime, StatReadError> {
    let reader = stats.open(Path::new(STAT)).map_err(StatReadError::Io)?;

    // the aggregate line comes first, so the rest of the table need not be parsed.
    for line in BufReader::new(reader).lines() {
        if let Some(time) = parse_aggregate(&line?)? {
            return Ok(time);
        }
    }

    Err(StatReadError::Missing)
}

/// parses an entry of the statistics table, if it is the aggregate "cpu" entry.
///
/// entries of any other kind, including those of individual cpus, yield `None`.
fn parse_aggregate(entry: &str) -> Result<Option<CpuTime>, EntryParseError> {
    let mut tokens = entry.split_whitespace();
    let kind = tokens.next().ok_or(EntryParseError::Empty)?;
    if kind != AGGREGATE {
        return Ok(None);
    }

    tokens
        .map(str::parse::<UserHz>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(EntryParseError::UserHzParse)
        .and_then(CpuTime::try_from)
        .map(Some)
}

// === impl StatReadError ===

impl std::error::Error for StatReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(io) => Some(io),
            Self::Entry(entry) => Some(entry),
            Self::Missing => None,
        }
    }
}

impl Display for StatReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(io) => f.write_fmt(format_args!("{}", io)),
            Self::Entry(entry) => f.write_fmt(format_args!("{}", entry)),
            Self::Missing => f.write_str("no aggregate cpu entry"),
        }
    }
}

impl From<EntryParseError> for StatReadError {
    fn from(entry: EntryParseError) -> Self {
        Self::Entry(entry)
    }
}

impl From<io::Error> for StatReadError {
    fn from(io: io::Error) -> Self {
        Self::Io(io)
    }
}

// === impl EntryParseError ===

impl fmt::Display for EntryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EntryParseError::*;
        match self {
            Empty => f.write_str("empty entry"),
            UserHzParse(error) => f.write_fmt(format_args!("invalid time value: {error}")),
            CpuTime => f.write_str("wrong number of cpu time values"),
        }
    }
}

impl std::error::Error for EntryParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use EntryParseError::*;

        match self {
            UserHzParse(error) => Some(error),
            Empty | CpuTime => None,
        }
    }
}
