//! Rate sampling
//!
//! Converts two readings of a monotonic counter into a rate. Engines use a
//! scale of 100 (active time over elapsed time as a percentage); power
//! domains use a scale of 1 (microjoules over microseconds gives watts).

use crate::domain::CounterSample;
use crate::error::SysmanError;

/// What a sampler's rate measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateKind {
    /// Percent of elapsed time the counter was active
    Utilization,
    /// Watts from an energy counter
    Power,
}

impl RateKind {
    pub const fn scale(&self) -> f64 {
        match self {
            Self::Utilization => 100.0,
            Self::Power => 1.0,
        }
    }
}

/// `scale * (current.value - previous.value) / (current.timestamp - previous.timestamp)`
///
/// Returns 0 when the timestamp did not advance.
pub fn compute_rate(previous: CounterSample, current: CounterSample, scale: f64) -> f64 {
    if current.timestamp <= previous.timestamp {
        return 0.0;
    }
    let delta_t = (current.timestamp - previous.timestamp) as f64;
    let delta_v = current.value.wrapping_sub(previous.value) as f64;
    scale * delta_v / delta_t
}

/// Previous sample plus the last derived rate for one entity
///
/// The baseline starts at zero, so the first rate covers everything the
/// counter accumulated since the driver started it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSampler {
    kind: RateKind,
    previous: CounterSample,
    rate: f64,
}

impl RateSampler {
    pub const fn new(kind: RateKind) -> Self {
        Self {
            kind,
            previous: CounterSample::new(0, 0),
            rate: 0.0,
        }
    }

    pub const fn utilization() -> Self {
        Self::new(RateKind::Utilization)
    }

    pub const fn power() -> Self {
        Self::new(RateKind::Power)
    }

    /// Fold in a fresh sample and return the new rate
    pub fn update(&mut self, current: CounterSample) -> f64 {
        let rate = compute_rate(self.previous, current, self.kind.scale());

        if self.kind == RateKind::Utilization && rate > 100.0 {
            log::warn!(
                "Utilization {:.1}% exceeds 100% (active {} -> {}, timestamp {} -> {})",
                rate,
                self.previous.value,
                current.value,
                self.previous.timestamp,
                current.timestamp
            );
        }

        self.previous = current;
        self.rate = rate;
        rate
    }

    /// Query a sample and update; on failure nothing changes
    pub fn sample<F>(&mut self, query: F) -> Result<f64, SysmanError>
    where
        F: FnOnce() -> Result<CounterSample, SysmanError>,
    {
        let current = query()?;
        Ok(self.update(current))
    }

    /// Last computed rate, unclamped
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn previous(&self) -> CounterSample {
        self.previous
    }

    pub fn kind(&self) -> RateKind {
        self.kind
    }
}
