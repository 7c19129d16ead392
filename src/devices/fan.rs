// Ceiling fan

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanSpeed {
    #[default]
    Off,
    Low,
    Medium,
    High,
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FanSpeed::Off => "off",
            FanSpeed::Low => "low",
            FanSpeed::Medium => "medium",
            FanSpeed::High => "high",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CeilingFan {
    name: String,
    speed: FanSpeed,
}

impl CeilingFan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            speed: FanSpeed::Off,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> FanSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: FanSpeed) {
        self.speed = speed;
    }
}
