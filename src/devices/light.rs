// Dimmable light

use super::{DeviceError, DeviceResult};

/// A named light with an on/off switch and a brightness level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Light {
    name: String,
    on: bool,
    level: u8,
}

impl Light {
    /// Highest accepted brightness level
    pub const MAX_LEVEL: u8 = 100;

    /// Create a light that is off at full brightness
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on: false,
            level: Self::MAX_LEVEL,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn turn_on(&mut self) {
        self.on = true;
    }

    pub fn turn_off(&mut self) {
        self.on = false;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Brightness level (0 to 100), kept while the light is off
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Set the brightness level
    ///
    /// # Errors
    /// Returns `DeviceError::InvalidValue` if `level` exceeds `MAX_LEVEL`.
    pub fn set_level(&mut self, level: u8) -> DeviceResult<()> {
        if level > Self::MAX_LEVEL {
            return Err(DeviceError::InvalidValue {
                field: "level",
                value: level.to_string(),
            });
        }
        self.level = level;
        Ok(())
    }
}
