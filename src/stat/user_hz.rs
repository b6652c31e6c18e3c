use std::{
    ops::{Add, Div},
    str::FromStr,
};

/// a span of cpu time, counted in clock ticks.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct UserHz(u64);

// === impl UserHz ===

impl UserHz {
    pub const ZERO: Self = Self(0);

    /// subtracts `rhs`, clamping at zero.
    ///
    /// some counters, such as `iowait`, may decrease.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        let (Self(lhs), Self(rhs)) = (self, rhs);
        Self(lhs.saturating_sub(rhs))
    }
}

impl From<u64> for UserHz {
    fn from(hz: u64) -> Self {
        Self(hz)
    }
}

impl FromStr for UserHz {
    type Err = <u64 as FromStr>::Err;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Add for UserHz {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        let (Self(lhs), Self(rhs)) = (self, rhs);
        Self(lhs.saturating_add(rhs))
    }
}

impl Div for UserHz {
    type Output = f64;
    fn div(self, rhs: Self) -> Self::Output {
        let to_float = |Self(hz)| -> f64 { hz as f64 };
        let (lhs, rhs) = (to_float(self), to_float(rhs));

        lhs / rhs
    }
}
