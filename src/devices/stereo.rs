// Stereo with selectable input and volume

use super::{DeviceError, DeviceResult};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StereoInput {
    #[default]
    Cd,
    Radio,
    Aux,
}

impl fmt::Display for StereoInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StereoInput::Cd => "cd",
            StereoInput::Radio => "radio",
            StereoInput::Aux => "aux",
        };
        f.write_str(name)
    }
}

impl FromStr for StereoInput {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cd" => Ok(StereoInput::Cd),
            "radio" => Ok(StereoInput::Radio),
            "aux" => Ok(StereoInput::Aux),
            other => Err(DeviceError::UnsupportedInput(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stereo {
    name: String,
    on: bool,
    input: StereoInput,
    volume: u8,
}

impl Stereo {
    /// Volume knob goes to eleven
    pub const MAX_VOLUME: u8 = 11;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on: false,
            input: StereoInput::default(),
            volume: 5,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn input(&self) -> StereoInput {
        self.input
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn turn_on(&mut self) {
        self.on = true;
    }

    pub fn turn_off(&mut self) {
        self.on = false;
    }

    pub fn set_input(&mut self, input: StereoInput) {
        self.input = input;
    }

    pub fn set_volume(&mut self, volume: u8) -> DeviceResult<()> {
        if volume > Self::MAX_VOLUME {
            return Err(DeviceError::InvalidValue {
                field: "volume",
                value: volume.to_string(),
            });
        }
        self.volume = volume;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_parsing() {
        assert_eq!("radio".parse::<StereoInput>().unwrap(), StereoInput::Radio);
        assert!("tape".parse::<StereoInput>().is_err());
    }

    #[test]
    fn test_volume_limit() {
        let mut stereo = Stereo::new("Den");
        assert!(stereo.set_volume(Stereo::MAX_VOLUME).is_ok());
        assert!(stereo.set_volume(12).is_err());
        assert_eq!(stereo.volume(), Stereo::MAX_VOLUME);
    }
}
