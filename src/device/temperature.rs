//! Temperature sensor entity

use crate::domain::Temperature;
use crate::error::SysmanError;
use crate::sysman::{Sysman, TempHandle};

/// A sensor and its last reading; `None` until the first refresh succeeds
#[derive(Debug, Clone)]
pub struct TemperatureSensor {
    handle: TempHandle,
    reading: Option<Temperature>,
}

impl TemperatureSensor {
    pub fn new(handle: TempHandle) -> Self {
        Self {
            handle,
            reading: None,
        }
    }

    pub fn refresh<S: Sysman + ?Sized>(&mut self, sysman: &S) -> Result<Temperature, SysmanError> {
        let reading = Temperature::new(sysman.temperature(self.handle)?);
        self.reading = Some(reading);
        Ok(reading)
    }

    pub fn reading(&self) -> Option<Temperature> {
        self.reading
    }
}
