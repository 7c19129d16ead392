// Remote Commander - Library exports for tests, benchmarks and the demo binary

pub mod command;
pub mod config;
pub mod devices;
pub mod scheduler;

// Re-export commonly used types for convenience
pub use command::{
    Command, CommandError, CommandResult, CompositeCommand, ErrorKind, Invoker, NoOpCommand,
    SharedCommand, UndoFailurePolicy,
};
pub use config::{CommanderConfig, ConfigError, InvokerConfig, QueueConfig};
pub use devices::{Device, DeviceError, device};
pub use scheduler::{Clock, EntryId, ManualClock, ScheduledQueue, SystemClock};
