// Garage door with obstruction sensor

use super::{DeviceError, DeviceResult};

/// Garage door that refuses to close while obstructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarageDoor {
    name: String,
    open: bool,
    obstructed: bool,
}

impl GarageDoor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: false,
            obstructed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close the door
    ///
    /// # Errors
    /// Returns `DeviceError::Obstructed` while the obstruction sensor is
    /// tripped; the door stays open.
    pub fn close(&mut self) -> DeviceResult<()> {
        if self.obstructed {
            return Err(DeviceError::Obstructed(self.name.clone()));
        }
        self.open = false;
        Ok(())
    }

    /// Simulate the obstruction sensor
    pub fn set_obstructed(&mut self, obstructed: bool) {
        self.obstructed = obstructed;
    }
}
