// CompositeCommand - Ordered macro of child commands

use crate::command::trait_def::{Command, CommandError, CommandResult};
use log::{debug, warn};

/// A named, ordered list of commands executed as one unit
///
/// Children execute in list order and undo in reverse list order, so a
/// later child that depends on state set up by an earlier one is reversed
/// first. Both directions stop at the first failure and leave the children
/// already processed as they are: there is no rollback.
pub struct CompositeCommand {
    name: String,
    commands: Vec<Box<dyn Command>>,
}

impl CompositeCommand {
    /// Create an empty macro
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Create a macro from already boxed children
    pub fn with_commands(name: impl Into<String>, commands: Vec<Box<dyn Command>>) -> Self {
        Self {
            name: name.into(),
            commands,
        }
    }

    /// Append a child
    ///
    /// Legal before or after execution; affects subsequent executes only.
    pub fn add_command<C: Command + 'static>(&mut self, command: C) -> &mut Self {
        self.commands.push(Box::new(command));
        self
    }

    /// Builder-style variant of `add_command`
    pub fn then<C: Command + 'static>(mut self, command: C) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Descriptions of the children, in execution order
    pub fn describe_children(&self) -> Vec<String> {
        self.commands.iter().map(|cmd| cmd.describe()).collect()
    }
}

impl Command for CompositeCommand {
    fn execute(&mut self) -> CommandResult<()> {
        debug!("Executing macro '{}' ({} steps)", self.name, self.commands.len());

        for (step, command) in self.commands.iter_mut().enumerate() {
            if let Err(source) = command.execute() {
                warn!(
                    "Macro '{}' stopped at step {} ({}): {}",
                    self.name,
                    step,
                    command.describe(),
                    source
                );
                return Err(CommandError::MacroExecution {
                    name: self.name.clone(),
                    step,
                    source: Box::new(source),
                });
            }
        }

        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        debug!("Undoing macro '{}'", self.name);

        for (step, command) in self.commands.iter_mut().enumerate().rev() {
            if let Err(source) = command.undo() {
                warn!(
                    "Macro '{}' undo stopped at step {} ({}): {}",
                    self.name,
                    step,
                    command.describe(),
                    source
                );
                return Err(CommandError::MacroUndo {
                    name: self.name.clone(),
                    step,
                    source: Box::new(source),
                });
            }
        }

        Ok(())
    }

    fn describe(&self) -> String {
        format!("Macro '{}' ({} commands)", self.name, self.commands.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::trait_def::ErrorKind;
    use crate::devices::DeviceError;
    use std::sync::{Arc, Mutex};

    type Journal = Arc<Mutex<Vec<String>>>;

    // Records every execute/undo into a shared journal
    struct Probe {
        label: &'static str,
        journal: Journal,
        fail_execute: bool,
        fail_undo: bool,
    }

    impl Probe {
        fn new(label: &'static str, journal: &Journal) -> Self {
            Self {
                label,
                journal: journal.clone(),
                fail_execute: false,
                fail_undo: false,
            }
        }

        fn failing_execute(mut self) -> Self {
            self.fail_execute = true;
            self
        }

        fn failing_undo(mut self) -> Self {
            self.fail_undo = true;
            self
        }
    }

    impl Command for Probe {
        fn execute(&mut self) -> CommandResult<()> {
            if self.fail_execute {
                return Err(CommandError::execution(
                    self.describe(),
                    DeviceError::Obstructed(self.label.into()),
                ));
            }
            self.journal.lock().unwrap().push(format!("do {}", self.label));
            Ok(())
        }

        fn undo(&mut self) -> CommandResult<()> {
            if self.fail_undo {
                return Err(CommandError::undo(
                    self.describe(),
                    DeviceError::Obstructed(self.label.into()),
                ));
            }
            self.journal.lock().unwrap().push(format!("undo {}", self.label));
            Ok(())
        }

        fn describe(&self) -> String {
            format!("Probe {}", self.label)
        }
    }

    fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    #[test]
    fn test_execute_in_order_undo_in_reverse() {
        let log = journal();
        let mut macro_cmd = CompositeCommand::new("Scene")
            .then(Probe::new("a", &log))
            .then(Probe::new("b", &log))
            .then(Probe::new("c", &log));

        macro_cmd.execute().unwrap();
        macro_cmd.undo().unwrap();

        assert_eq!(
            entries(&log),
            vec!["do a", "do b", "do c", "undo c", "undo b", "undo a"]
        );
    }

    #[test]
    fn test_execute_stops_at_first_failure() {
        let log = journal();
        let mut macro_cmd = CompositeCommand::new("Scene")
            .then(Probe::new("a", &log))
            .then(Probe::new("b", &log).failing_execute())
            .then(Probe::new("c", &log));

        let err = macro_cmd.execute().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Execution);
        match &err {
            CommandError::MacroExecution { name, step, .. } => {
                assert_eq!(name, "Scene");
                assert_eq!(*step, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // No rollback of "a", "c" never attempted
        assert_eq!(entries(&log), vec!["do a"]);
    }

    #[test]
    fn test_undo_stops_at_first_failure() {
        let log = journal();
        let mut macro_cmd = CompositeCommand::new("Scene")
            .then(Probe::new("a", &log))
            .then(Probe::new("b", &log).failing_undo())
            .then(Probe::new("c", &log));

        macro_cmd.execute().unwrap();
        let err = macro_cmd.undo().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Undo);
        assert!(err.to_string().contains("Macro 'Scene' undo failed at step 1"));
        assert_eq!(entries(&log), vec!["do a", "do b", "do c", "undo c"]);
    }

    #[test]
    fn test_add_command_after_execution() {
        let log = journal();
        let mut macro_cmd = CompositeCommand::new("Grow");
        macro_cmd.add_command(Probe::new("a", &log));
        macro_cmd.execute().unwrap();

        macro_cmd.add_command(Probe::new("b", &log));
        assert_eq!(macro_cmd.len(), 2);
        macro_cmd.execute().unwrap();

        assert_eq!(entries(&log), vec!["do a", "do a", "do b"]);
    }

    #[test]
    fn test_describe() {
        let log = journal();
        let macro_cmd = CompositeCommand::with_commands(
            "Party",
            vec![
                Box::new(Probe::new("a", &log)) as Box<dyn Command>,
                Box::new(Probe::new("b", &log)),
            ],
        );
        assert_eq!(macro_cmd.describe(), "Macro 'Party' (2 commands)");
        assert_eq!(macro_cmd.describe_children(), vec!["Probe a", "Probe b"]);
        assert!(CompositeCommand::new("Empty").is_empty());
    }

    #[test]
    fn test_empty_macro_is_noop() {
        let mut macro_cmd = CompositeCommand::new("Empty");
        assert!(macro_cmd.execute().is_ok());
        assert!(macro_cmd.undo().is_ok());
    }
}
