use std::time::Duration;

/// Where vertical refresh comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Vsync {
    /// A fixed-rate ticker, like a real panel.
    Timed { hz: f64 },
    /// `wait_vsync` returns at once. For benchmarks and tests.
    Immediate,
}

impl Vsync {
    pub const DEFAULT_HZ: f64 = 60.0;

    /// Refresh period, `None` for [`Vsync::Immediate`] or a rate that isn't positive.
    pub fn period(&self) -> Option<Duration> {
        match *self {
            Vsync::Timed { hz } if hz.is_finite() && hz > 0.0 => Some(Duration::from_secs_f64(1.0 / hz)),
            _ => None,
        }
    }
}

impl Default for Vsync {
    fn default() -> Self {
        Vsync::Timed { hz: Vsync::DEFAULT_HZ }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimConfig {
    pub vsync: Vsync,
    /// Raise the core 1 thread to the highest OS priority. Failure is ignored.
    pub core1_max_priority: bool,
}

impl SimConfig {
    pub fn immediate() -> Self {
        SimConfig {
            vsync: Vsync::Immediate,
            ..Default::default()
        }
    }

    pub fn timed(hz: f64) -> Self {
        SimConfig {
            vsync: Vsync::Timed { hz },
            ..Default::default()
        }
    }
}
