// Command trait definition, error taxonomy and shared handles

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Boxed receiver error carried as the source of execution/undo failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for command operations
pub type CommandResult<T> = Result<T, CommandError>;

/// Coarse classification of a `CommandError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid input to a configuration call
    Validation,
    /// Slot index outside the invoker's slot range
    OutOfRange,
    /// Undo/redo requested with nothing recorded
    EmptyHistory,
    /// Peek on an empty scheduled queue
    EmptyQueue,
    /// A receiver operation failed while executing
    Execution,
    /// A receiver operation failed while undoing, or undo had nothing to reverse
    Undo,
}

/// Errors that can occur while configuring, executing or undoing commands
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Slot {slot} out of range (slot count {slot_count})")]
    OutOfRange { slot: usize, slot_count: usize },

    #[error("Nothing to undo")]
    EmptyHistory,

    #[error("Nothing to redo")]
    EmptyRedo,

    #[error("Scheduled queue is empty")]
    EmptyQueue,

    #[error("Execution failed for '{command}': {source}")]
    Execution {
        command: String,
        #[source]
        source: BoxError,
    },

    #[error("Macro '{name}' failed at step {step}: {source}")]
    MacroExecution {
        name: String,
        step: usize,
        #[source]
        source: Box<CommandError>,
    },

    #[error(
        "Scheduled command '{command}' due at {scheduled_at} failed after {executed} executed: {source}"
    )]
    PartialExecution {
        executed: usize,
        command: String,
        scheduled_at: DateTime<Utc>,
        #[source]
        source: Box<CommandError>,
    },

    #[error("Undo failed for '{command}': {source}")]
    Undo {
        command: String,
        #[source]
        source: BoxError,
    },

    #[error("Undo failed for '{0}': command has not been executed")]
    NotExecuted(String),

    #[error("Macro '{name}' undo failed at step {step}: {source}")]
    MacroUndo {
        name: String,
        step: usize,
        #[source]
        source: Box<CommandError>,
    },
}

impl CommandError {
    /// Wrap a receiver failure raised during `execute`
    pub fn execution(command: impl Into<String>, source: impl Into<BoxError>) -> Self {
        CommandError::Execution {
            command: command.into(),
            source: source.into(),
        }
    }

    /// Wrap a receiver failure raised during `undo`
    pub fn undo(command: impl Into<String>, source: impl Into<BoxError>) -> Self {
        CommandError::Undo {
            command: command.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::Validation(_) => ErrorKind::Validation,
            CommandError::OutOfRange { .. } => ErrorKind::OutOfRange,
            CommandError::EmptyHistory | CommandError::EmptyRedo => ErrorKind::EmptyHistory,
            CommandError::EmptyQueue => ErrorKind::EmptyQueue,
            CommandError::Execution { .. }
            | CommandError::MacroExecution { .. }
            | CommandError::PartialExecution { .. } => ErrorKind::Execution,
            CommandError::Undo { .. }
            | CommandError::NotExecuted(_)
            | CommandError::MacroUndo { .. } => ErrorKind::Undo,
        }
    }

    /// Number of scheduled commands that ran before a partial execution stopped
    pub fn executed_count(&self) -> Option<usize> {
        match self {
            CommandError::PartialExecution { executed, .. } => Some(*executed),
            _ => None,
        }
    }
}

/// A reversible, describable unit of work bound to a receiver
///
/// Implementations capture whatever they need to reverse themselves while
/// `execute` runs, not at construction. Receivers are reached through
/// handles held by the command itself.
///
/// # Example
/// ```
/// use remote_commander::command::trait_def::{Command, CommandError, CommandResult};
///
/// struct Counter {
///     value: i32,
///     previous: Option<i32>,
/// }
///
/// impl Command for Counter {
///     fn execute(&mut self) -> CommandResult<()> {
///         self.previous = Some(self.value);
///         self.value += 1;
///         Ok(())
///     }
///
///     fn undo(&mut self) -> CommandResult<()> {
///         self.value = self
///             .previous
///             .ok_or_else(|| CommandError::NotExecuted(self.describe()))?;
///         Ok(())
///     }
///
///     fn describe(&self) -> String {
///         "Increment counter".to_string()
///     }
/// }
///
/// let mut counter = Counter { value: 1, previous: None };
/// counter.execute().unwrap();
/// counter.undo().unwrap();
/// assert_eq!(counter.value, 1);
/// ```
pub trait Command: Send {
    /// Perform the action, recording the state needed by `undo` first
    ///
    /// Callers must not execute twice without an intervening undo.
    fn execute(&mut self) -> CommandResult<()>;

    /// Reverse the most recent `execute`
    fn undo(&mut self) -> CommandResult<()>;

    /// Stable human-readable description, for display and logs
    fn describe(&self) -> String;
}

impl<C: Command + ?Sized> Command for Box<C> {
    fn execute(&mut self) -> CommandResult<()> {
        (**self).execute()
    }

    fn undo(&mut self) -> CommandResult<()> {
        (**self).undo()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Identity command, bound to every slot until it is configured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCommand;

impl Command for NoOpCommand {
    fn execute(&mut self) -> CommandResult<()> {
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        "No Command".to_string()
    }
}

/// Cloneable handle to a single command instance
///
/// Clones refer to the same instance, so the command bound to a slot and
/// the history entries recorded by pressing it share captured state.
#[derive(Clone)]
pub struct SharedCommand {
    inner: Arc<Mutex<dyn Command>>,
}

impl SharedCommand {
    pub fn new<C: Command + 'static>(command: C) -> Self {
        let inner: Arc<Mutex<C>> = Arc::new(Mutex::new(command));
        Self { inner }
    }

    pub fn noop() -> Self {
        Self::new(NoOpCommand)
    }

    /// Whether both handles refer to the same command instance
    pub fn ptr_eq(&self, other: &SharedCommand) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn lock(&self) -> MutexGuard<'_, dyn Command + 'static> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Command for SharedCommand {
    fn execute(&mut self) -> CommandResult<()> {
        self.lock().execute()
    }

    fn undo(&mut self) -> CommandResult<()> {
        self.lock().undo()
    }

    fn describe(&self) -> String {
        self.lock().describe()
    }
}

impl fmt::Debug for SharedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedCommand")
            .field(&self.describe())
            .finish()
    }
}
