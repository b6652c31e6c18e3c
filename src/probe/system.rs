use {
    super::ProbeError,
    crate::source::StatsSource,
    std::path::Path,
};

const LOADAVG: &str = "/proc/loadavg";
const UPTIME: &str = "/proc/uptime";
const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";
const ROOT: &str = "/";

/// the `vcgencmd` utility reports power and throttling flags on raspberry pi boards.
const VCGENCMD: &str = "vcgencmd";

/// system load averages over 1, 5, and 15 minutes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LoadAvg {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// space and inode usage of a filesystem.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FsUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub used_percent: f64,
    pub inode_percent: f64,
}

pub(super) fn read_load(source: &impl StatsSource) -> Result<LoadAvg, ProbeError> {
    let contents = source.read_to_string(Path::new(LOADAVG))?;
    parse_load(&contents)
}

pub(super) fn parse_load(contents: &str) -> Result<LoadAvg, ProbeError> {
    let mut loads = contents.split_whitespace().map(str::parse::<f64>);
    match (loads.next(), loads.next(), loads.next()) {
        (Some(Ok(one)), Some(Ok(five)), Some(Ok(fifteen))) => Ok(LoadAvg { one, five, fifteen }),
        _ => Err(ProbeError::Malformed { what: "loadavg" }),
    }
}

pub(super) fn read_uptime(source: &impl StatsSource) -> Result<f64, ProbeError> {
    let contents = source.read_to_string(Path::new(UPTIME))?;
    first_number(&contents).ok_or(ProbeError::Malformed { what: "uptime" })
}

/// reads the first thermal zone, reported in millidegrees celsius.
pub(super) fn read_temperature(source: &impl StatsSource) -> Result<f64, ProbeError> {
    let contents = source.read_to_string(Path::new(THERMAL_ZONE))?;
    contents
        .trim()
        .parse::<i64>()
        .map(|millidegrees| millidegrees as f64 / 1000.0)
        .map_err(|_| ProbeError::Malformed {
            what: "thermal zone",
        })
}

pub(super) fn read_throttled(source: &impl StatsSource) -> Result<u32, ProbeError> {
    let output = source.run(VCGENCMD, &["get_throttled"])?;
    parse_throttled(&output)
}

/// parses output such as `throttled=0x50005`.
pub(super) fn parse_throttled(output: &str) -> Result<u32, ProbeError> {
    let malformed = || ProbeError::Malformed {
        what: "throttling flags",
    };

    let (_, hex) = output.split_once("0x").ok_or_else(malformed)?;
    let digits = hex
        .find(|c: char| !c.is_ascii_hexdigit())
        .map_or(hex, |end| &hex[..end]);

    u32::from_str_radix(digits, 16).map_err(|_| malformed())
}

pub(super) fn read_fs_usage(source: &impl StatsSource) -> Result<FsUsage, ProbeError> {
    let stat = source.statvfs(Path::new(ROOT))?;

    let total_bytes = stat.blocks.saturating_mul(stat.fragment_size);
    let available = stat.blocks_available.saturating_mul(stat.fragment_size);
    let used_bytes = total_bytes.saturating_sub(available);
    let used_inodes = stat.files.saturating_sub(stat.files_available);

    Ok(FsUsage {
        used_bytes,
        total_bytes,
        used_percent: percent(used_bytes, total_bytes),
        inode_percent: percent(used_inodes, stat.files),
    })
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

fn first_number(contents: &str) -> Option<f64> {
    contents.split_whitespace().next()?.parse().ok()
}
