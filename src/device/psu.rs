//! PSU entity

use crate::domain::{PsuProperties, PsuState, VoltageStatus};
use crate::error::SysmanError;
use crate::sysman::{PsuHandle, Sysman};

#[derive(Debug, Clone)]
pub struct Psu {
    handle: PsuHandle,
    properties: PsuProperties,
    state: PsuState,
}

impl Psu {
    /// Read properties and the initial state
    pub fn new<S: Sysman + ?Sized>(sysman: &S, handle: PsuHandle) -> Result<Self, SysmanError> {
        let properties = sysman.psu_properties(handle)?;
        let state = sysman.psu_state(handle)?;
        Ok(Self {
            handle,
            properties,
            state,
        })
    }

    pub fn refresh<S: Sysman + ?Sized>(&mut self, sysman: &S) -> Result<&PsuState, SysmanError> {
        self.state = sysman.psu_state(self.handle)?;
        Ok(&self.state)
    }

    pub fn properties(&self) -> &PsuProperties {
        &self.properties
    }

    pub fn state(&self) -> &PsuState {
        &self.state
    }

    pub fn voltage_status(&self) -> VoltageStatus {
        self.state.voltage_status
    }
}
