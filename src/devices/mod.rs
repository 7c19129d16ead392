// Simulated receivers driven by commands
//
// Each device is plain state plus validated setters. Commands hold a
// `Device<T>` handle so the on/off pair bound to a slot and the entries in
// the invoker history all act on the same receiver.

pub mod fan;
pub mod garage;
pub mod light;
pub mod stereo;
pub mod thermostat;

pub use fan::{CeilingFan, FanSpeed};
pub use garage::GarageDoor;
pub use light::Light;
pub use stereo::{Stereo, StereoInput};
pub use thermostat::{Thermostat, ThermostatMode};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to a receiver
pub type Device<T> = Arc<Mutex<T>>;

/// Result type for receiver operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors reported by receivers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviceError {
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("{0} is obstructed")]
    Obstructed(String),
}

/// Wrap a receiver in a shared handle
pub fn device<T>(receiver: T) -> Device<T> {
    Arc::new(Mutex::new(receiver))
}

/// Lock a receiver, recovering the guard if a previous holder panicked
///
/// Receivers only hold plain values, so their state stays consistent even
/// when a lock was poisoned.
pub fn lock<T: ?Sized>(device: &Mutex<T>) -> MutexGuard<'_, T> {
    device.lock().unwrap_or_else(PoisonError::into_inner)
}
