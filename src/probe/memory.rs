use {
    super::ProbeError,
    crate::source::StatsSource,
    std::path::Path,
};

const MEMINFO: &str = "/proc/meminfo";

/// memory totals, in bytes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MemInfo {
    pub total: u64,
    pub available: u64,
}

pub(super) fn read(source: &impl StatsSource) -> Result<MemInfo, ProbeError> {
    source
        .read_to_string(Path::new(MEMINFO))
        .map_err(ProbeError::from)
        .and_then(|contents| parse(&contents))
}

/// parses `/proc/meminfo`.
///
/// kernels older than 3.14 do not report `MemAvailable`; free memory is used instead.
pub(super) fn parse(contents: &str) -> Result<MemInfo, ProbeError> {
    let (mut total, mut available, mut free) = (None, None, None);

    for line in contents.lines() {
        let mut tokens = line.split_whitespace();
        let (Some(key), Some(value)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        let Ok(kib) = value.parse::<u64>() else {
            continue;
        };
        let slot = match key {
            "MemTotal:" => &mut total,
            "MemAvailable:" => &mut available,
            "MemFree:" => &mut free,
            _ => continue,
        };
        *slot = Some(kib.saturating_mul(1024));
    }

    match total {
        Some(total) if total > 0 => Ok(MemInfo {
            total,
            available: available.or(free).unwrap_or(0),
        }),
        _ => Err(ProbeError::Malformed { what: "meminfo" }),
    }
}
