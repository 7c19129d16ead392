// Thermostat with target temperature and operating mode

use super::{DeviceError, DeviceResult};
use std::fmt;
use std::str::FromStr;

/// Operating mode of a thermostat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThermostatMode {
    Heat,
    Cool,
    #[default]
    Auto,
    Off,
}

impl ThermostatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThermostatMode::Heat => "heat",
            ThermostatMode::Cool => "cool",
            ThermostatMode::Auto => "auto",
            ThermostatMode::Off => "off",
        }
    }
}

impl fmt::Display for ThermostatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThermostatMode {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heat" => Ok(ThermostatMode::Heat),
            "cool" => Ok(ThermostatMode::Cool),
            "auto" => Ok(ThermostatMode::Auto),
            "off" => Ok(ThermostatMode::Off),
            other => Err(DeviceError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Thermostat holding a target temperature in degrees Celsius
#[derive(Debug, Clone, PartialEq)]
pub struct Thermostat {
    name: String,
    temperature: f32,
    mode: ThermostatMode,
}

impl Thermostat {
    pub const MIN_TEMPERATURE: f32 = 10.0;
    pub const MAX_TEMPERATURE: f32 = 32.0;
    pub const DEFAULT_TEMPERATURE: f32 = 20.0;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            temperature: Self::DEFAULT_TEMPERATURE,
            mode: ThermostatMode::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn mode(&self) -> ThermostatMode {
        self.mode
    }

    /// Set the target temperature
    ///
    /// # Errors
    /// Returns `DeviceError::InvalidValue` for non-finite values or values
    /// outside `MIN_TEMPERATURE..=MAX_TEMPERATURE`.
    pub fn set_temperature(&mut self, celsius: f32) -> DeviceResult<()> {
        if !(Self::MIN_TEMPERATURE..=Self::MAX_TEMPERATURE).contains(&celsius) {
            return Err(DeviceError::InvalidValue {
                field: "temperature",
                value: celsius.to_string(),
            });
        }
        self.temperature = celsius;
        Ok(())
    }

    /// Set the mode from its textual name (`heat`, `cool`, `auto`, `off`)
    pub fn set_mode(&mut self, mode: &str) -> DeviceResult<()> {
        self.mode = mode.parse()?;
        Ok(())
    }

    /// Set an already validated mode
    pub fn apply_mode(&mut self, mode: ThermostatMode) {
        self.mode = mode;
    }
}
