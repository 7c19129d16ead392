// ScheduledQueue - Commands ordered by target execution time

use crate::command::trait_def::{Command, CommandError, CommandResult};
use crate::config::QueueConfig;
use crate::scheduler::clock::{Clock, SystemClock};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// Identifier of one scheduled entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A command waiting for its execution time
pub struct ScheduledEntry {
    id: EntryId,
    scheduled_at: DateTime<Utc>,
    command: Box<dyn Command>,
}

impl ScheduledEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    pub fn command(&self) -> &dyn Command {
        self.command.as_ref()
    }

    pub fn describe(&self) -> String {
        self.command.describe()
    }

    /// Whether the entry should run at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_at <= now
    }
}

impl fmt::Debug for ScheduledEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledEntry")
            .field("id", &self.id)
            .field("scheduled_at", &self.scheduled_at)
            .field("command", &self.command.describe())
            .finish()
    }
}

/// Commands ordered by scheduled time, ties kept in insertion order
///
/// The queue never runs anything on its own: the caller polls
/// `execute_due` whenever it wants due entries to run.
///
/// # Ordering
/// A new entry is inserted after every entry scheduled at or before its
/// time, so entries sharing a timestamp run first-scheduled, first-executed.
pub struct ScheduledQueue<C: Clock = SystemClock> {
    clock: C,
    entries: VecDeque<ScheduledEntry>,
}

impl ScheduledQueue<SystemClock> {
    /// Create a queue driven by the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ScheduledQueue<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ScheduledQueue<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            entries: VecDeque::new(),
        }
    }

    pub fn with_config(clock: C, config: &QueueConfig) -> Self {
        Self {
            clock,
            entries: VecDeque::with_capacity(config.initial_capacity),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Schedule a command for the current time
    pub fn enqueue_now<Cmd: Command + 'static>(&mut self, command: Cmd) -> EntryId {
        let now = self.clock.now();
        self.schedule_at(command, now)
    }

    /// Schedule a command `delay` from now
    ///
    /// # Errors
    /// Returns `CommandError::Validation` if `now + delay` is not representable.
    pub fn schedule_in<Cmd: Command + 'static>(
        &mut self,
        command: Cmd,
        delay: Duration,
    ) -> CommandResult<EntryId> {
        let now = self.clock.now();
        let at = now.checked_add_signed(delay).ok_or_else(|| {
            CommandError::Validation(format!("delay {} from {} is out of range", delay, now))
        })?;
        Ok(self.schedule_at(command, at))
    }

    /// Schedule a command at an absolute time
    pub fn schedule_at<Cmd: Command + 'static>(
        &mut self,
        command: Cmd,
        at: DateTime<Utc>,
    ) -> EntryId {
        let entry = ScheduledEntry {
            id: EntryId::generate(),
            scheduled_at: at,
            command: Box::new(command),
        };
        let id = entry.id;

        // First position whose time is strictly later keeps ties stable
        let index = self.entries.partition_point(|e| e.scheduled_at <= at);
        debug!(
            "Scheduled '{}' at {} (position {} of {})",
            entry.describe(),
            at,
            index,
            self.entries.len() + 1
        );
        self.entries.insert(index, entry);
        id
    }

    /// Execute every entry due according to the queue's clock
    pub fn execute_due(&mut self) -> CommandResult<usize> {
        let now = self.clock.now();
        self.execute_due_at(now)
    }

    /// Execute, in order, every entry scheduled at or before `now`
    ///
    /// Each entry is removed once it executes successfully. Returns the
    /// number executed; `Ok(0)` leaves the queue untouched when nothing is due.
    ///
    /// # Errors
    /// Stops at the first failing entry and returns
    /// `CommandError::PartialExecution` carrying the count executed so far.
    /// The failing entry and everything after it stay queued; the failing
    /// entry is not retried until the caller polls again.
    pub fn execute_due_at(&mut self, now: DateTime<Utc>) -> CommandResult<usize> {
        let mut executed = 0;

        while let Some(entry) = self.entries.front_mut() {
            if !entry.is_due(now) {
                break;
            }

            if let Err(source) = entry.command.execute() {
                let command = entry.command.describe();
                let scheduled_at = entry.scheduled_at;
                warn!(
                    "Scheduled '{}' failed after {} executed, {} entries left: {}",
                    command,
                    executed,
                    self.entries.len(),
                    source
                );
                return Err(CommandError::PartialExecution {
                    executed,
                    command,
                    scheduled_at,
                    source: Box::new(source),
                });
            }

            self.entries.pop_front();
            executed += 1;
        }

        if executed > 0 {
            info!(
                "Executed {} due command(s), {} remaining",
                executed,
                self.entries.len()
            );
        }
        Ok(executed)
    }

    /// Earliest entry, without removing it
    ///
    /// # Errors
    /// Returns `CommandError::EmptyQueue` if nothing is scheduled.
    pub fn peek(&self) -> CommandResult<&ScheduledEntry> {
        self.entries.front().ok_or(CommandError::EmptyQueue)
    }

    /// Remove a specific entry without executing it
    pub fn cancel(&mut self, id: EntryId) -> Option<ScheduledEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        let entry = self.entries.remove(index)?;
        debug!("Cancelled '{}' scheduled at {}", entry.describe(), entry.scheduled_at);
        Some(entry)
    }

    /// Entries in execution order
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &ScheduledEntry> + '_ {
        self.entries.iter()
    }

    /// Number of entries due at the clock's current time
    pub fn due_count(&self) -> usize {
        let now = self.clock.now();
        self.entries.partition_point(|e| e.is_due(now))
    }

    /// Time of the earliest entry
    pub fn next_due_at(&self) -> Option<DateTime<Utc>> {
        self.entries.front().map(|e| e.scheduled_at)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
