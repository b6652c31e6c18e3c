use super::*;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CpuTime {
    /// time spent in user mode.
    user: UserHz,
    /// time spent in user mode with low priority (nice).
    nice: UserHz,
    /// time spent in system mode.
    system: UserHz,
    /// time spent in the idle task.
    ///
    /// this value should be USER_HZ times the second entry in the /proc/uptime pseudo-file.
    idle: UserHz,
    /// time waiting for i/o to complete.
    ///
    /// this value is not reliable, for the following reasons:
    ///   *  the cpu will not wait for i/o to complete; iowait is the time that a task is waiting
    ///      for i/o to complete. when a cpu goes into idle state for outstanding task i/o,
    ///      another task will be scheduled on this cpu.
    ///   *  on a multi-core cpu, the task waiting for i/o to complete is not running on any cpu,
    ///      so the iowait of each cpu is difficult to calculate.
    ///   *  the value in this field may decrease in certain conditions.
    iowait: UserHz,
    /// time servicing interrupts.
    irq: UserHz,
    /// time servicing softirqs.
    softirq: UserHz,
    /// stolen time, which is the time spent in other operating systems when running in a
    /// virtualized environment.
    steal: UserHz,
    /// time spent running a virtual cpu for guest operating systems under the control of the linux
    /// kernel. this is already accounted for in `user`.
    guest: UserHz,
    /// time spent running a niced guest. this is already accounted for in `nice`.
    guest_nice: UserHz,
}

/// a measurement of the difference between two [`CpuTime`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Measurement {
    /// ticks spent idle, including time waiting for i/o.
    pub(crate) idle: UserHz,
    /// ticks spent in any state.
    pub(crate) total: UserHz,
}

// == impl Measurement ===

impl Measurement {
    pub fn new(a: &CpuTime, b: &CpuTime) -> Self {
        // counters that went backwards count as no time at all.
        let total = b.total().saturating_sub(a.total());
        let idle = b.idle().saturating_sub(a.idle()).min(total);

        Self { idle, total }
    }

    /// returns the percentage of non-idle cpu time.
    ///
    /// a measurement spanning no ticks at all is reported as 0%.
    pub fn percentage(&self) -> f64 {
        let Self { idle, total } = *self;

        if total == UserHz::ZERO {
            return 0.0;
        }

        let percent = (1.0 - idle / total) * 100.0;
        percent.clamp(0.0, 100.0)
    }
}

// === impl CpuTime ===

impl CpuTime {
    /// the fewest fields a `cpu` line may have. older kernels omit the trailing ones.
    const MIN_FIELDS: usize = 4;

    /// time spent idle, including time waiting for i/o.
    pub fn idle(&self) -> UserHz {
        self.idle + self.iowait
    }

    /// time spent in any state.
    pub fn total(&self) -> UserHz {
        let Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
            // guest time is included in `user` and `nice`.
            guest: _,
            guest_nice: _,
        } = *self;

        user + nice + system + idle + iowait + irq + softirq + steal
    }
}

impl TryFrom<Vec<UserHz>> for CpuTime {
    type Error = EntryParseError;
    fn try_from(mut times: Vec<UserHz>) -> Result<Self, Self::Error> {
        if !(Self::MIN_FIELDS..=10).contains(&times.len()) {
            return Err(EntryParseError::CpuTime);
        }
        times.resize(10, UserHz::ZERO);

        <_ as TryInto<[_; 10]>>::try_into(times)
            .map(Self::from)
            .map_err(|_| EntryParseError::CpuTime)
    }
}

impl From<[UserHz; 10]> for CpuTime {
    fn from(
        [
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
            guest,
            guest_nice,
        ]: [UserHz; 10],
    ) -> Self {
        Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
            guest,
            guest_nice,
        }
    }
}
