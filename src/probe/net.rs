use {
    super::ProbeError,
    crate::source::StatsSource,
    std::path::Path,
};

const NET_DEV: &str = "/proc/net/dev";

const LOOPBACK: &str = "lo";

/// cumulative counters for one network interface.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NetCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_errors: u64,
    pub rx_drops: u64,
    pub tx_errors: u64,
    pub tx_drops: u64,
}

pub(super) fn read(source: &impl StatsSource, iface: &str) -> Result<NetCounters, ProbeError> {
    let contents = source.read_to_string(Path::new(NET_DEV))?;
    parse(&contents, iface)
}

/// returns the first interface that is not the loopback device.
pub(super) fn choose(source: &impl StatsSource) -> Result<String, ProbeError> {
    let contents = source.read_to_string(Path::new(NET_DEV))?;
    interfaces(&contents)
        .map(|(name, _)| name)
        .find(|name| *name != LOOPBACK)
        .map(str::to_owned)
        .ok_or(ProbeError::NotFound {
            what: "network interface",
        })
}

pub(super) fn parse(contents: &str, iface: &str) -> Result<NetCounters, ProbeError> {
    let (_, fields) = interfaces(contents)
        .find(|(name, _)| *name == iface)
        .ok_or(ProbeError::NotFound {
            what: "network interface",
        })?;

    let fields = fields
        .split_whitespace()
        .map(str::parse::<u64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ProbeError::Malformed { what: "net/dev" })?;

    // the receive columns come first: bytes packets errs drop fifo frame compressed multicast.
    // the transmit columns follow: bytes packets errs drop fifo colls carrier compressed.
    match fields.as_slice() {
        [rx_bytes, _, rx_errors, rx_drops, _, _, _, _, tx_bytes, _, tx_errors, tx_drops, ..] => {
            Ok(NetCounters {
                rx_bytes: *rx_bytes,
                tx_bytes: *tx_bytes,
                rx_errors: *rx_errors,
                rx_drops: *rx_drops,
                tx_errors: *tx_errors,
                tx_drops: *tx_drops,
            })
        }
        _ => Err(ProbeError::Malformed { what: "net/dev" }),
    }
}

/// yields each interface's name and the counters following it.
fn interfaces(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    // the first two lines are column headers.
    contents
        .lines()
        .skip(2)
        .filter_map(|line| line.split_once(':'))
        .map(|(name, fields)| (name.trim(), fields))
}
