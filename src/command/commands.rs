// Concrete command implementations bound to device receivers

use crate::command::trait_def::{Command, CommandError, CommandResult};
use crate::devices::{
    self, CeilingFan, Device, DeviceResult, FanSpeed, GarageDoor, Light, Stereo, StereoInput,
    Thermostat, ThermostatMode,
};
use log::debug;

/// Snapshot of a light's observable state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LightState {
    on: bool,
    level: u8,
}

impl LightState {
    fn capture(light: &Light) -> Self {
        Self {
            on: light.is_on(),
            level: light.level(),
        }
    }

    fn restore(self, light: &mut Light) -> DeviceResult<()> {
        light.set_level(self.level)?;
        if self.on {
            light.turn_on();
        } else {
            light.turn_off();
        }
        Ok(())
    }
}

/// Command to switch a light on
pub struct LightOnCommand {
    light: Device<Light>,
    previous: Option<bool>,
}

impl LightOnCommand {
    pub fn new(light: Device<Light>) -> Self {
        Self {
            light,
            previous: None,
        }
    }
}

impl Command for LightOnCommand {
    fn execute(&mut self) -> CommandResult<()> {
        let mut light = devices::lock(&self.light);
        self.previous = Some(light.is_on());
        light.turn_on();
        debug!("Light '{}' on", light.name());
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        let was_on = self
            .previous
            .ok_or_else(|| CommandError::NotExecuted(self.describe()))?;

        let mut light = devices::lock(&self.light);
        if !was_on {
            light.turn_off();
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("Turn on {}", devices::lock(&self.light).name())
    }
}

/// Command to switch a light off
pub struct LightOffCommand {
    light: Device<Light>,
    previous: Option<bool>,
}

impl LightOffCommand {
    pub fn new(light: Device<Light>) -> Self {
        Self {
            light,
            previous: None,
        }
    }
}

impl Command for LightOffCommand {
    fn execute(&mut self) -> CommandResult<()> {
        let mut light = devices::lock(&self.light);
        self.previous = Some(light.is_on());
        light.turn_off();
        debug!("Light '{}' off", light.name());
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        let was_on = self
            .previous
            .ok_or_else(|| CommandError::NotExecuted(self.describe()))?;

        let mut light = devices::lock(&self.light);
        if was_on {
            light.turn_on();
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("Turn off {}", devices::lock(&self.light).name())
    }
}

/// Command to switch a light on at a given brightness
///
/// Undo restores both the previous level and the previous on/off state.
pub struct DimLightCommand {
    light: Device<Light>,
    level: u8,
    previous: Option<LightState>,
}

impl DimLightCommand {
    pub fn new(light: Device<Light>, level: u8) -> Self {
        Self {
            light,
            level,
            previous: None,
        }
    }
}

impl Command for DimLightCommand {
    fn execute(&mut self) -> CommandResult<()> {
        let description = self.describe();
        let mut light = devices::lock(&self.light);
        let snapshot = LightState::capture(&light);

        light
            .set_level(self.level)
            .map_err(|e| CommandError::execution(description, e))?;
        light.turn_on();
        self.previous = Some(snapshot);
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        let snapshot = self
            .previous
            .ok_or_else(|| CommandError::NotExecuted(self.describe()))?;
        let description = self.describe();

        let mut light = devices::lock(&self.light);
        snapshot
            .restore(&mut light)
            .map_err(|e| CommandError::undo(description, e))
    }

    fn describe(&self) -> String {
        format!(
            "Dim {} to {}%",
            devices::lock(&self.light).name(),
            self.level
        )
    }
}

/// Command to change a thermostat's target temperature
pub struct SetTemperatureCommand {
    thermostat: Device<Thermostat>,
    celsius: f32,
    previous: Option<f32>,
}

impl SetTemperatureCommand {
    pub fn new(thermostat: Device<Thermostat>, celsius: f32) -> Self {
        Self {
            thermostat,
            celsius,
            previous: None,
        }
    }
}

impl Command for SetTemperatureCommand {
    fn execute(&mut self) -> CommandResult<()> {
        let description = self.describe();
        let mut thermostat = devices::lock(&self.thermostat);
        let previous = thermostat.temperature();

        thermostat
            .set_temperature(self.celsius)
            .map_err(|e| CommandError::execution(description, e))?;
        self.previous = Some(previous);
        debug!(
            "Thermostat '{}' {:.1} -> {:.1}",
            thermostat.name(),
            previous,
            self.celsius
        );
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        let previous = self
            .previous
            .ok_or_else(|| CommandError::NotExecuted(self.describe()))?;
        let description = self.describe();

        devices::lock(&self.thermostat)
            .set_temperature(previous)
            .map_err(|e| CommandError::undo(description, e))
    }

    fn describe(&self) -> String {
        format!(
            "Set {} to {:.1}°C",
            devices::lock(&self.thermostat).name(),
            self.celsius
        )
    }
}

/// Command to change a thermostat's mode by name
///
/// The mode string is validated by the receiver when the command executes.
pub struct SetThermostatModeCommand {
    thermostat: Device<Thermostat>,
    mode: String,
    previous: Option<ThermostatMode>,
}

impl SetThermostatModeCommand {
    pub fn new(thermostat: Device<Thermostat>, mode: impl Into<String>) -> Self {
        Self {
            thermostat,
            mode: mode.into(),
            previous: None,
        }
    }
}

impl Command for SetThermostatModeCommand {
    fn execute(&mut self) -> CommandResult<()> {
        let description = self.describe();
        let mut thermostat = devices::lock(&self.thermostat);
        let previous = thermostat.mode();

        thermostat
            .set_mode(&self.mode)
            .map_err(|e| CommandError::execution(description, e))?;
        self.previous = Some(previous);
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        let previous = self
            .previous
            .ok_or_else(|| CommandError::NotExecuted(self.describe()))?;

        devices::lock(&self.thermostat).apply_mode(previous);
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "Set {} mode to {}",
            devices::lock(&self.thermostat).name(),
            self.mode
        )
    }
}

/// Command to set a ceiling fan speed
pub struct CeilingFanCommand {
    fan: Device<CeilingFan>,
    speed: FanSpeed,
    previous: Option<FanSpeed>,
}

impl CeilingFanCommand {
    pub fn new(fan: Device<CeilingFan>, speed: FanSpeed) -> Self {
        Self {
            fan,
            speed,
            previous: None,
        }
    }

    pub fn high(fan: Device<CeilingFan>) -> Self {
        Self::new(fan, FanSpeed::High)
    }

    pub fn medium(fan: Device<CeilingFan>) -> Self {
        Self::new(fan, FanSpeed::Medium)
    }

    pub fn low(fan: Device<CeilingFan>) -> Self {
        Self::new(fan, FanSpeed::Low)
    }

    pub fn off(fan: Device<CeilingFan>) -> Self {
        Self::new(fan, FanSpeed::Off)
    }
}

impl Command for CeilingFanCommand {
    fn execute(&mut self) -> CommandResult<()> {
        let mut fan = devices::lock(&self.fan);
        self.previous = Some(fan.speed());
        fan.set_speed(self.speed);
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        let previous = self
            .previous
            .ok_or_else(|| CommandError::NotExecuted(self.describe()))?;
        devices::lock(&self.fan).set_speed(previous);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("Set {} to {}", devices::lock(&self.fan).name(), self.speed)
    }
}

/// Command to open a garage door
///
/// Undo closes the door again if it was closed before, which fails while
/// the door is obstructed.
pub struct GarageDoorOpenCommand {
    door: Device<GarageDoor>,
    previous: Option<bool>,
}

impl GarageDoorOpenCommand {
    pub fn new(door: Device<GarageDoor>) -> Self {
        Self {
            door,
            previous: None,
        }
    }
}

impl Command for GarageDoorOpenCommand {
    fn execute(&mut self) -> CommandResult<()> {
        let mut door = devices::lock(&self.door);
        self.previous = Some(door.is_open());
        door.open();
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        let was_open = self
            .previous
            .ok_or_else(|| CommandError::NotExecuted(self.describe()))?;
        if was_open {
            return Ok(());
        }

        let description = self.describe();
        devices::lock(&self.door)
            .close()
            .map_err(|e| CommandError::undo(description, e))
    }

    fn describe(&self) -> String {
        format!("Open {}", devices::lock(&self.door).name())
    }
}

/// Command to close a garage door
pub struct GarageDoorCloseCommand {
    door: Device<GarageDoor>,
    previous: Option<bool>,
}

impl GarageDoorCloseCommand {
    pub fn new(door: Device<GarageDoor>) -> Self {
        Self {
            door,
            previous: None,
        }
    }
}

impl Command for GarageDoorCloseCommand {
    fn execute(&mut self) -> CommandResult<()> {
        let description = self.describe();
        let mut door = devices::lock(&self.door);
        let was_open = door.is_open();

        door.close()
            .map_err(|e| CommandError::execution(description, e))?;
        self.previous = Some(was_open);
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        let was_open = self
            .previous
            .ok_or_else(|| CommandError::NotExecuted(self.describe()))?;
        if was_open {
            devices::lock(&self.door).open();
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("Close {}", devices::lock(&self.door).name())
    }
}

/// Snapshot of a stereo's observable state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StereoState {
    on: bool,
    input: StereoInput,
    volume: u8,
}

/// Command to switch a stereo on with a given input and volume
pub struct StereoOnCommand {
    stereo: Device<Stereo>,
    input: String,
    volume: u8,
    previous: Option<StereoState>,
}

impl StereoOnCommand {
    pub fn new(stereo: Device<Stereo>, input: impl Into<String>, volume: u8) -> Self {
        Self {
            stereo,
            input: input.into(),
            volume,
            previous: None,
        }
    }
}

impl Command for StereoOnCommand {
    fn execute(&mut self) -> CommandResult<()> {
        let description = self.describe();
        let input: StereoInput = self
            .input
            .parse()
            .map_err(|e| CommandError::execution(description.clone(), e))?;

        let mut stereo = devices::lock(&self.stereo);
        let snapshot = StereoState {
            on: stereo.is_on(),
            input: stereo.input(),
            volume: stereo.volume(),
        };

        // Volume is the only fallible setter; apply it before anything else
        stereo
            .set_volume(self.volume)
            .map_err(|e| CommandError::execution(description, e))?;
        stereo.set_input(input);
        stereo.turn_on();
        self.previous = Some(snapshot);
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        let snapshot = self
            .previous
            .ok_or_else(|| CommandError::NotExecuted(self.describe()))?;
        let description = self.describe();

        let mut stereo = devices::lock(&self.stereo);
        stereo
            .set_volume(snapshot.volume)
            .map_err(|e| CommandError::undo(description, e))?;
        stereo.set_input(snapshot.input);
        if snapshot.on {
            stereo.turn_on();
        } else {
            stereo.turn_off();
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "Play {} on {} at volume {}",
            self.input,
            devices::lock(&self.stereo).name(),
            self.volume
        )
    }
}

/// Command to switch a stereo off
pub struct StereoOffCommand {
    stereo: Device<Stereo>,
    previous: Option<bool>,
}

impl StereoOffCommand {
    pub fn new(stereo: Device<Stereo>) -> Self {
        Self {
            stereo,
            previous: None,
        }
    }
}

impl Command for StereoOffCommand {
    fn execute(&mut self) -> CommandResult<()> {
        let mut stereo = devices::lock(&self.stereo);
        self.previous = Some(stereo.is_on());
        stereo.turn_off();
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        let was_on = self
            .previous
            .ok_or_else(|| CommandError::NotExecuted(self.describe()))?;
        if was_on {
            devices::lock(&self.stereo).turn_on();
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("Turn off {}", devices::lock(&self.stereo).name())
    }
}
