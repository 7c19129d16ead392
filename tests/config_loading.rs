// Integration test: loading configuration files from disk

use remote_commander::{
    CommanderConfig, ConfigError, Invoker, ManualClock, ScheduledQueue, UndoFailurePolicy,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("commander.ron");
    fs::write(
        &path,
        r#"(
    invoker: (
        slot_count: 3,
        max_history: 2,
        undo_failure: restore,
    ),
    queue: (
        initial_capacity: 4,
    ),
)"#,
    )
    .unwrap();

    let config = CommanderConfig::load(&path).unwrap();
    assert_eq!(config.invoker.slot_count, 3);
    assert_eq!(config.invoker.max_history, 2);
    assert_eq!(config.invoker.undo_failure, UndoFailurePolicy::Restore);

    let remote = Invoker::with_config(&config.invoker).unwrap();
    assert_eq!(remote.slot_count(), 3);
    assert_eq!(remote.max_history(), 2);
    assert_eq!(remote.undo_failure_policy(), UndoFailurePolicy::Restore);

    let queue = ScheduledQueue::with_config(ManualClock::default(), &config.queue);
    assert!(queue.is_empty());
}

#[test]
fn test_saved_config_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("saved.ron");

    let mut config = CommanderConfig::default();
    config.invoker.max_history = 50;
    fs::write(&path, config.to_ron_string().unwrap()).unwrap();

    assert_eq!(CommanderConfig::load(&path).unwrap(), config);
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = CommanderConfig::load(temp_dir.path().join("absent.ron")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("zero.ron");
    fs::write(&path, "(invoker: (slot_count: 0))").unwrap();

    let err = CommanderConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("slot_count"));
}
