// Time-ordered execution of commands

pub mod clock;
pub mod queue;

pub use clock::{Clock, ManualClock, SystemClock};
pub use queue::{EntryId, ScheduledEntry, ScheduledQueue};
