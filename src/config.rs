// Configuration for the invoker and the scheduled queue
//
// Loaded from RON. Every field has a default, so a partial file (or an
// empty `()`) is a valid configuration.

use crate::command::invoker::{DEFAULT_MAX_HISTORY, DEFAULT_SLOT_COUNT, UndoFailurePolicy};
use crate::command::trait_def::{CommandError, CommandResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] ron::Error),

    #[error(transparent)]
    Invalid(#[from] CommandError),
}

/// Invoker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvokerConfig {
    /// Number of on/off slots
    pub slot_count: usize,
    /// Maximum number of undoable commands kept
    pub max_history: usize,
    pub undo_failure: UndoFailurePolicy,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            max_history: DEFAULT_MAX_HISTORY,
            undo_failure: UndoFailurePolicy::default(),
        }
    }
}

impl InvokerConfig {
    pub fn validate(&self) -> CommandResult<()> {
        if self.slot_count == 0 {
            return Err(CommandError::Validation(
                "slot_count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Scheduled queue settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Entries preallocated for the queue
    pub initial_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommanderConfig {
    pub invoker: InvokerConfig,
    pub queue: QueueConfig,
}

impl CommanderConfig {
    /// Parse and validate a RON document
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: CommanderConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn validate(&self) -> CommandResult<()> {
        self.invoker.validate()
    }
}
