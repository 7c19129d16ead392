// Command Pattern core
//
// Every action that should be replayable or undoable goes through the
// Command trait. Three consumers build on it:
// - Invoker: slots of on/off commands plus a bounded undo/redo history
// - CompositeCommand: an ordered macro that is itself a Command
// - ScheduledQueue (crate::scheduler): commands ordered by execution time
//
// Commands capture the previous state of their receiver during execute and
// restore it on undo.

pub mod commands;
pub mod composite;
pub mod invoker;
pub mod trait_def;

pub use commands::*;
pub use composite::CompositeCommand;
pub use invoker::{Invoker, InvokerSnapshot, SlotSnapshot, UndoFailurePolicy};
pub use trait_def::{
    BoxError, Command, CommandError, CommandResult, ErrorKind, NoOpCommand, SharedCommand,
};
