use {
    super::ProbeError,
    crate::source::StatsSource,
    std::path::Path,
};

const DISKSTATS: &str = "/proc/diskstats";

/// cumulative sector counters for one block device.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DiskCounters {
    pub sectors_read: u64,
    pub sectors_written: u64,
}

pub(super) fn read(source: &impl StatsSource, device: &str) -> Result<DiskCounters, ProbeError> {
    let contents = source.read_to_string(Path::new(DISKSTATS))?;
    parse(&contents, device)
}

/// returns the highest-ranked block device.
pub(super) fn choose(source: &impl StatsSource) -> Result<String, ProbeError> {
    let contents = source.read_to_string(Path::new(DISKSTATS))?;
    best(&contents).ok_or(ProbeError::NotFound {
        what: "block device",
    })
}

pub(super) fn parse(contents: &str, device: &str) -> Result<DiskCounters, ProbeError> {
    for line in contents.lines() {
        let fields = line.split_whitespace().collect::<Vec<_>>();
        // major minor name reads merged sectors ms writes merged sectors ms ...
        let [_, _, name, _, _, read, _, _, _, written, _, ..] = fields.as_slice() else {
            continue;
        };
        if *name != device {
            continue;
        }

        return match (read.parse::<u64>(), written.parse::<u64>()) {
            (Ok(sectors_read), Ok(sectors_written)) => Ok(DiskCounters {
                sectors_read,
                sectors_written,
            }),
            _ => Err(ProbeError::Malformed { what: "diskstats" }),
        };
    }

    Err(ProbeError::NotFound {
        what: "block device",
    })
}

/// returns the name of the highest-scoring device, if any scored above zero.
///
/// the first of several equally scored devices wins.
pub(super) fn best(contents: &str) -> Option<String> {
    let mut best: Option<(u32, &str)> = None;

    for name in contents.lines().filter_map(|l| l.split_whitespace().nth(2)) {
        let score = score(name);
        if score > best.map_or(0, |(s, _)| s) {
            best = Some((score, name));
        }
    }

    best.map(|(_, name)| name.to_owned())
}

/// ranks a block device by how likely it is to be the system's main disk.
///
/// partitions and virtual devices score zero. unfamiliar names fall through to a low score.
pub(super) fn score(name: &str) -> u32 {
    const EXCLUDED: [&str; 6] = ["loop", "ram", "dm-", "md", "zram", "sr"];

    if name.is_empty() || is_partition(name) || EXCLUDED.iter().any(|p| name.starts_with(p)) {
        return 0;
    }

    match name {
        _ if name.starts_with("mmcblk0") => 1000,
        _ if name.starts_with("nvme") => 900,
        _ if name.starts_with("sd") => 800,
        "vda" => 700,
        _ => 100,
    }
}

/// whether `name` looks like a partition of a disk, such as `sda1`, `mmcblk0p2` or `nvme0n1p1`.
fn is_partition(name: &str) -> bool {
    let bytes = name.as_bytes();

    if let Some(rest) = name.strip_prefix("sd") {
        let rest = rest.as_bytes();
        return rest.first().is_some_and(u8::is_ascii_alphabetic)
            && rest.get(1).is_some_and(u8::is_ascii_digit);
    }

    if name.starts_with("mmcblk") || name.starts_with("nvme") {
        return bytes
            .iter()
            .position(|b| *b == b'p')
            .and_then(|p| bytes.get(p + 1))
            .is_some_and(u8::is_ascii_digit);
    }

    false
}
