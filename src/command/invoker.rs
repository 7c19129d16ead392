// Invoker - Slot-based remote control with bounded undo history

use crate::command::trait_def::{Command, CommandError, CommandResult, SharedCommand};
use crate::config::InvokerConfig;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of slots on a remote control
pub const DEFAULT_SLOT_COUNT: usize = 7;

/// Default maximum number of commands to keep in history
pub const DEFAULT_MAX_HISTORY: usize = 20;

/// What happens to a history entry whose undo fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoFailurePolicy {
    /// The entry is dropped; history stays one shorter
    #[default]
    Discard,
    /// The entry is pushed back on top of history so undo can be retried
    ///
    /// A `CompositeCommand` whose undo failed part way is restored as a
    /// whole, so a retry undoes its later children again. Children that
    /// apply relative changes instead of restoring a snapshot are reversed
    /// twice.
    Restore,
}

#[derive(Debug, Clone, Copy)]
enum Button {
    On,
    Off,
}

/// Activate/deactivate pair bound to one slot
#[derive(Debug, Clone)]
struct SlotBinding {
    on: SharedCommand,
    off: SharedCommand,
}

impl Default for SlotBinding {
    fn default() -> Self {
        Self {
            on: SharedCommand::noop(),
            off: SharedCommand::noop(),
        }
    }
}

/// Serializable view of an invoker, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokerSnapshot {
    pub slots: Vec<SlotSnapshot>,
    /// Oldest first
    pub history: Vec<String>,
    pub redo: Vec<String>,
    pub max_history: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub slot: usize,
    pub on: String,
    pub off: String,
}

/// Remote control mapping slots to on/off commands
///
/// The invoker maintains two lists:
/// - History: commands that have been executed and can be undone (oldest first)
/// - Redo: commands that have been undone and can be executed again
///
/// When a slot is pressed:
/// 1. Execute the bound command
/// 2. On success, append it to history
/// 3. Clear the redo list (new timeline)
/// 4. Evict the oldest history entries beyond `max_history`
///
/// A failed execute is never recorded, so it can never be undone.
/// Unconfigured slots hold no-op commands; pressing them succeeds.
pub struct Invoker {
    slots: Vec<SlotBinding>,

    /// Executed commands, most recent at the back
    history: VecDeque<SharedCommand>,

    /// Undone commands, most recent at the back
    redo_stack: Vec<SharedCommand>,

    max_history: usize,

    undo_failure: UndoFailurePolicy,
}

impl Invoker {
    /// Create an invoker with the default slot count and history limit
    pub fn new() -> Self {
        Self::with_slots(DEFAULT_SLOT_COUNT)
    }

    /// Create an invoker with a custom number of slots
    pub fn with_slots(slot_count: usize) -> Self {
        Self {
            slots: vec![SlotBinding::default(); slot_count],
            history: VecDeque::with_capacity(DEFAULT_MAX_HISTORY),
            redo_stack: Vec::new(),
            max_history: DEFAULT_MAX_HISTORY,
            undo_failure: UndoFailurePolicy::default(),
        }
    }

    /// Create an invoker from configuration
    ///
    /// # Errors
    /// Returns `CommandError::Validation` if the configuration is invalid.
    pub fn with_config(config: &InvokerConfig) -> CommandResult<Self> {
        config.validate()?;

        let mut invoker = Self::with_slots(config.slot_count);
        invoker.max_history = config.max_history;
        invoker.undo_failure = config.undo_failure;
        Ok(invoker)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn undo_failure_policy(&self) -> UndoFailurePolicy {
        self.undo_failure
    }

    pub fn set_undo_failure_policy(&mut self, policy: UndoFailurePolicy) {
        self.undo_failure = policy;
    }

    fn binding(&self, slot: usize) -> CommandResult<&SlotBinding> {
        self.slots.get(slot).ok_or(CommandError::OutOfRange {
            slot,
            slot_count: self.slots.len(),
        })
    }

    /// Bind an on/off pair to a slot, replacing any previous binding
    ///
    /// # Errors
    /// Returns `CommandError::OutOfRange` if `slot >= slot_count()`.
    pub fn configure_slot(
        &mut self,
        slot: usize,
        on: SharedCommand,
        off: SharedCommand,
    ) -> CommandResult<()> {
        let slot_count = self.slots.len();
        let binding = self
            .slots
            .get_mut(slot)
            .ok_or(CommandError::OutOfRange { slot, slot_count })?;

        debug!(
            "Slot {} configured: on '{}', off '{}'",
            slot,
            on.describe(),
            off.describe()
        );
        *binding = SlotBinding { on, off };
        Ok(())
    }

    /// Press the "on" button of a slot
    pub fn press_on(&mut self, slot: usize) -> CommandResult<()> {
        self.press(slot, Button::On)
    }

    /// Press the "off" button of a slot
    pub fn press_off(&mut self, slot: usize) -> CommandResult<()> {
        self.press(slot, Button::Off)
    }

    fn press(&mut self, slot: usize, button: Button) -> CommandResult<()> {
        let binding = self.binding(slot)?;
        let mut command = match button {
            Button::On => binding.on.clone(),
            Button::Off => binding.off.clone(),
        };

        debug!("Slot {} {:?}: {}", slot, button, command.describe());
        command.execute()?;
        self.record(command);
        Ok(())
    }

    /// Execute an ad-hoc command and record it like a slot press
    ///
    /// # Errors
    /// Returns the command's error; nothing is recorded in that case.
    pub fn run(&mut self, mut command: SharedCommand) -> CommandResult<()> {
        debug!("Running {}", command.describe());
        command.execute()?;
        self.record(command);
        Ok(())
    }

    fn record(&mut self, command: SharedCommand) {
        self.history.push_back(command);

        // We're on a new timeline now
        self.redo_stack.clear();

        self.trim_history();
    }

    fn trim_history(&mut self) {
        let mut evicted = 0;
        while self.history.len() > self.max_history {
            self.history.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            info!(
                "History trimmed by {} (limit {})",
                evicted, self.max_history
            );
        }
    }

    /// Undo the most recently recorded command
    ///
    /// Returns the description of the undone command.
    ///
    /// # Errors
    /// - `CommandError::EmptyHistory` if there is nothing to undo; nothing changes.
    /// - The command's undo error. The entry is then dropped or restored on
    ///   top of history according to the `UndoFailurePolicy`.
    pub fn undo(&mut self) -> CommandResult<String> {
        let mut command = self.history.pop_back().ok_or(CommandError::EmptyHistory)?;
        let description = command.describe();

        if let Err(err) = command.undo() {
            match self.undo_failure {
                UndoFailurePolicy::Discard => {
                    warn!("Undo of '{}' failed, entry discarded: {}", description, err);
                }
                UndoFailurePolicy::Restore => {
                    warn!("Undo of '{}' failed, entry kept for retry: {}", description, err);
                    self.history.push_back(command);
                }
            }
            return Err(err);
        }

        debug!("Undid {}", description);
        self.redo_stack.push(command);
        Ok(description)
    }

    /// Execute the most recently undone command again
    ///
    /// # Errors
    /// - `CommandError::EmptyRedo` if nothing has been undone.
    /// - The command's execution error; the command is then dropped.
    pub fn redo(&mut self) -> CommandResult<String> {
        let mut command = self.redo_stack.pop().ok_or(CommandError::EmptyRedo)?;
        let description = command.describe();

        command.execute()?;

        debug!("Redid {}", description);
        self.history.push_back(command);
        self.trim_history();
        Ok(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the command `undo` would reverse
    pub fn undo_description(&self) -> Option<String> {
        self.history.back().map(|cmd| cmd.describe())
    }

    /// Description of the command `redo` would execute
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|cmd| cmd.describe())
    }

    /// Recorded commands, oldest first
    ///
    /// Pressing the same slot repeatedly records the same `SharedCommand`
    /// several times. Those entries share the state captured by the latest
    /// execute, so only the newest of them changes anything when undone.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &SharedCommand> + '_ {
        self.history.iter()
    }

    /// Number of recorded entries, counting repeated presses of one slot
    /// separately (see `history`)
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Descriptions of recorded commands, oldest first
    pub fn history_descriptions(&self) -> Vec<String> {
        self.history.iter().map(|cmd| cmd.describe()).collect()
    }

    /// Forget all recorded and undone commands
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.redo_stack.clear();
    }

    /// Change the history limit, evicting the oldest entries immediately
    pub fn set_max_history(&mut self, max_history: usize) {
        self.max_history = max_history;
        self.trim_history();
    }

    /// Descriptions of the (on, off) commands bound to a slot
    pub fn slot_descriptions(&self, slot: usize) -> CommandResult<(String, String)> {
        let binding = self.binding(slot)?;
        Ok((binding.on.describe(), binding.off.describe()))
    }

    pub fn snapshot(&self) -> InvokerSnapshot {
        InvokerSnapshot {
            slots: self
                .slots
                .iter()
                .enumerate()
                .map(|(slot, binding)| SlotSnapshot {
                    slot,
                    on: binding.on.describe(),
                    off: binding.off.describe(),
                })
                .collect(),
            history: self.history_descriptions(),
            redo: self.redo_stack.iter().map(|cmd| cmd.describe()).collect(),
            max_history: self.max_history,
        }
    }
}

impl Default for Invoker {
    fn default() -> Self {
        Self::new()
    }
}
