//! Power domain entity

use crate::device::rate::RateSampler;
use crate::domain::{PowerProperties, Watts};
use crate::error::SysmanError;
use crate::sysman::{PowerHandle, Sysman};

/// One power domain of a device, with its energy sampler
#[derive(Debug, Clone)]
pub struct PowerDomain {
    handle: PowerHandle,
    properties: PowerProperties,
    sampler: RateSampler,
}

impl PowerDomain {
    /// Read properties and take the first energy sample
    pub fn new<S: Sysman + ?Sized>(sysman: &S, handle: PowerHandle) -> Result<Self, SysmanError> {
        let properties = sysman.power_properties(handle)?;
        let mut sampler = RateSampler::power();
        sampler.sample(|| sysman.energy_counter(handle))?;

        Ok(Self {
            handle,
            properties,
            sampler,
        })
    }

    /// Sample the energy counter and recompute average power
    pub fn refresh<S: Sysman + ?Sized>(&mut self, sysman: &S) -> Result<Watts, SysmanError> {
        let handle = self.handle;
        self.sampler
            .sample(|| sysman.energy_counter(handle))
            .map(Watts)
    }

    pub fn properties(&self) -> &PowerProperties {
        &self.properties
    }

    /// Average power over the last interval
    pub fn power(&self) -> Watts {
        Watts(self.sampler.rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDevice, MockSysman};

    #[test]
    fn test_refresh_computes_watts() {
        let mock = MockSysman::new(vec![MockDevice::new(0x8086, 0x56c0)
            .with_energy(&[(10_000_000, 1_000_000), (85_000_000, 2_000_000)])]);

        let mut domain = PowerDomain::new(&mock, PowerHandle(1 << 16)).unwrap();
        assert_eq!(domain.refresh(&mock).unwrap(), Watts(75.0));
        assert_eq!(domain.power(), Watts(75.0));
    }

    #[test]
    fn test_same_timestamp_reads_zero_watts() {
        let mock = MockSysman::new(vec![MockDevice::new(0x8086, 0x56c0)
            .with_energy(&[(10_000_000, 1_000_000)])]);

        let mut domain = PowerDomain::new(&mock, PowerHandle(1 << 16)).unwrap();
        assert_eq!(domain.refresh(&mock).unwrap(), Watts(0.0));
    }
}
