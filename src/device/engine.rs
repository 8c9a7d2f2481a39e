//! Engine entity

use crate::device::rate::RateSampler;
use crate::domain::EngineProperties;
use crate::error::SysmanError;
use crate::sysman::{EngineHandle, Sysman};

/// One engine group of a device, with its utilization sampler
#[derive(Debug, Clone)]
pub struct Engine {
    handle: EngineHandle,
    properties: EngineProperties,
    sampler: RateSampler,
}

impl Engine {
    /// Read properties and take the first activity sample
    pub fn new<S: Sysman + ?Sized>(sysman: &S, handle: EngineHandle) -> Result<Self, SysmanError> {
        let properties = sysman.engine_properties(handle)?;
        let mut sampler = RateSampler::utilization();
        sampler.sample(|| sysman.engine_activity(handle))?;

        Ok(Self {
            handle,
            properties,
            sampler,
        })
    }

    /// Sample activity and recompute utilization
    pub fn refresh<S: Sysman + ?Sized>(&mut self, sysman: &S) -> Result<f64, SysmanError> {
        let handle = self.handle;
        self.sampler.sample(|| sysman.engine_activity(handle))
    }

    pub fn properties(&self) -> &EngineProperties {
        &self.properties
    }

    /// Utilization percentage from the last successful refresh
    pub fn utilization(&self) -> f64 {
        self.sampler.rate()
    }
}
