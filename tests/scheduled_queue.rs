// Integration test: scheduled queue ordering and draining

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};
use remote_commander::command::{LightOffCommand, LightOnCommand, SetTemperatureCommand};
use remote_commander::devices::{self, Light, Thermostat};
use remote_commander::{
    Clock, Command, CommandError, CommandResult, ErrorKind, ManualClock, ScheduledQueue, device,
};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

// Appends its label to a shared log when executed
struct Stamp {
    label: String,
    log: Log,
}

impl Stamp {
    fn new(label: impl Into<String>, log: &Log) -> Self {
        Self {
            label: label.into(),
            log: log.clone(),
        }
    }
}

impl Command for Stamp {
    fn execute(&mut self) -> CommandResult<()> {
        self.log.lock().unwrap().push(self.label.clone());
        Ok(())
    }

    fn undo(&mut self) -> CommandResult<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 5, 18, 0, 0).unwrap()
}

#[test]
fn test_earlier_entry_runs_first() {
    let clock = ManualClock::new(start());
    let mut queue = ScheduledQueue::with_clock(clock.clone());
    let log: Log = Arc::default();

    queue.schedule_in(Stamp::new("A", &log), Duration::seconds(10)).unwrap();
    queue.schedule_in(Stamp::new("B", &log), Duration::seconds(5)).unwrap();
    assert_eq!(queue.peek().unwrap().describe(), "B");

    clock.advance(Duration::seconds(4));
    assert_eq!(queue.execute_due().unwrap(), 0);
    assert_eq!(queue.len(), 2);

    clock.advance(Duration::seconds(7));
    assert_eq!(queue.execute_due().unwrap(), 2);
    assert_eq!(*log.lock().unwrap(), vec!["B", "A"]);
    assert!(queue.is_empty());
}

#[test]
fn test_random_insertion_drains_sorted_and_stable() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let clock = ManualClock::new(start());
    let mut queue = ScheduledQueue::with_clock(clock.clone());
    let log: Log = Arc::default();

    // Few distinct offsets so ties are common
    let mut offsets: Vec<i64> = (0..64).map(|_| rng.gen_range(0..8)).collect();
    offsets.shuffle(&mut rng);

    for (index, offset) in offsets.iter().enumerate() {
        queue
            .schedule_in(
                Stamp::new(format!("{offset}:{index:02}"), &log),
                Duration::minutes(*offset),
            )
            .unwrap();
    }

    let times: Vec<_> = queue.entries().map(|e| e.scheduled_at()).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));

    clock.advance(Duration::hours(1));
    assert_eq!(queue.execute_due().unwrap(), offsets.len());

    // Sorting by offset alone is stable, so this is the expected FIFO order among ties
    let mut expected: Vec<(i64, usize)> = offsets.iter().copied().zip(0..).collect();
    expected.sort_by_key(|(offset, _)| *offset);
    let expected: Vec<String> = expected
        .into_iter()
        .map(|(offset, index)| format!("{offset}:{index:02}"))
        .collect();
    assert_eq!(*log.lock().unwrap(), expected);
}

#[test]
fn test_partial_execution_keeps_failing_entry() {
    let clock = ManualClock::new(start());
    let mut queue = ScheduledQueue::with_clock(clock.clone());
    let light = device(Light::new("Porch"));
    let thermostat = device(Thermostat::new("Hallway"));

    queue
        .schedule_in(LightOnCommand::new(light.clone()), Duration::minutes(1))
        .unwrap();
    queue
        .schedule_in(
            SetTemperatureCommand::new(thermostat.clone(), 45.0),
            Duration::minutes(2),
        )
        .unwrap();
    queue
        .schedule_in(LightOffCommand::new(light.clone()), Duration::minutes(3))
        .unwrap();

    clock.advance(Duration::minutes(5));
    let err = queue.execute_due().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Execution);
    assert_eq!(err.executed_count(), Some(1));
    match &err {
        CommandError::PartialExecution {
            command,
            scheduled_at,
            ..
        } => {
            assert_eq!(command, "Set Hallway to 45.0°C");
            assert_eq!(*scheduled_at, start() + Duration::minutes(2));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // The failing entry and the one behind it are still queued
    assert!(devices::lock(&light).is_on());
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.peek().unwrap().describe(), "Set Hallway to 45.0°C");

    // Polling again hits the same failure without running anything
    let err = queue.execute_due().unwrap_err();
    assert_eq!(err.executed_count(), Some(0));

    let failing = queue.peek().unwrap().id();
    assert!(queue.cancel(failing).is_some());
    assert_eq!(queue.execute_due().unwrap(), 1);
    assert!(!devices::lock(&light).is_on());
}

#[test]
fn test_entries_scheduled_in_the_past_are_due() {
    let clock = ManualClock::new(start());
    let mut queue = ScheduledQueue::with_clock(clock.clone());
    let log: Log = Arc::default();

    queue.schedule_at(Stamp::new("late", &log), clock.now() - Duration::hours(1));
    queue.enqueue_now(Stamp::new("now", &log));
    assert_eq!(queue.due_count(), 2);

    assert_eq!(queue.execute_due().unwrap(), 2);
    assert_eq!(*log.lock().unwrap(), vec!["late", "now"]);
    assert!(matches!(queue.peek(), Err(CommandError::EmptyQueue)));
}
