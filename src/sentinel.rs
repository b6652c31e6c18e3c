use {
    crate::{
        config::Config,
        deriver::{MetricDeriver, Recording},
        probe::{Devices, Snapshot},
        source::{Clock, ProcFs, StatsSource, SystemClock},
    },
    tracing::info,
};


/// observes kernel statistics.
pub struct Sentinel<C = SystemClock, S = ProcFs> {
    /// the clock being used to measure time.
    clock: C,
    /// the underlying source of kernel statistics.
    source: S,
    /// the devices whose i/o is being measured.
    devices: Devices,
    /// the previous reading of each counter.
    deriver: MetricDeriver,
}

/// === impl Sentinel ===

impl Sentinel {
    /// creates a new [`Sentinel`] observing the live system.
    pub fn new(config: &Config) -> Self {
        let source = ProcFs;
        let devices = Devices::select(config, &source);
        Self::with(SystemClock, source, devices)
    }
}

impl<C, S> Sentinel<C, S>
where
    C: Clock,
    S: StatsSource,
{
    pub fn with(clock: C, source: S, devices: Devices) -> Self {
        let Devices { iface, disk } = &devices;
        info!(?iface, ?disk, "observing devices");

        Self {
            clock,
            source,
            devices,
            deriver: MetricDeriver::new(),
        }
    }

    /// returns a [`Recording`] of the system since this was last called.
    ///
    /// NB: rates are measured against the previous reading, so the first recording reports
    /// every rate as zero.
    pub fn observe(&mut self) -> Recording {
        let Self {
            clock,
            source,
            devices,
            deriver,
        } = self;

        let snapshot = Snapshot::read(&*source, &*clock, &*devices);
        deriver.derive(snapshot)
    }

    pub fn devices(&self) -> &Devices {
        &self.devices
    }

    /// the number of clock ticks in a second, which process cpu times are counted in.
    pub fn clock_ticks(&self) -> u64 {
        self.source.clock_ticks()
    }
}
