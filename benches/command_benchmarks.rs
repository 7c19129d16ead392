use chrono::{Duration, TimeZone, Utc};
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use remote_commander::command::{CeilingFanCommand, LightOffCommand, LightOnCommand};
use remote_commander::devices::{CeilingFan, Light};
use remote_commander::{
    Clock, Command, CompositeCommand, Invoker, ManualClock, NoOpCommand, ScheduledQueue,
    SharedCommand, device,
};

/// Benchmark slot presses, including history eviction once the limit is hit
fn bench_invoker_press(c: &mut Criterion) {
    let light = device(Light::new("Bench light"));
    let mut remote = Invoker::new();
    remote
        .configure_slot(
            0,
            SharedCommand::new(LightOnCommand::new(light.clone())),
            SharedCommand::new(LightOffCommand::new(light.clone())),
        )
        .unwrap();

    c.bench_function("invoker_press_on_off", |b| {
        b.iter(|| {
            black_box(remote.press_on(0)).unwrap();
            black_box(remote.press_off(0)).unwrap();
        });
    });
}

/// Benchmark draining a full history through undo
fn bench_invoker_undo(c: &mut Criterion) {
    let fan = device(CeilingFan::new("Bench fan"));

    c.bench_function("invoker_undo_full_history", |b| {
        b.iter_batched(
            || {
                let mut remote = Invoker::new();
                remote
                    .configure_slot(
                        0,
                        SharedCommand::new(CeilingFanCommand::high(fan.clone())),
                        SharedCommand::new(CeilingFanCommand::off(fan.clone())),
                    )
                    .unwrap();
                for _ in 0..remote.max_history() {
                    remote.press_on(0).unwrap();
                }
                remote
            },
            |mut remote| {
                while remote.can_undo() {
                    black_box(remote.undo()).unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark macro execution by step count
fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");

    for steps in [4, 16, 64] {
        let mut macro_command = CompositeCommand::new("Bench macro");
        for _ in 0..steps {
            macro_command.add_command(NoOpCommand);
        }

        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, _| {
            b.iter(|| {
                black_box(macro_command.execute()).unwrap();
                black_box(macro_command.undo()).unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark scheduling in reverse time order (worst case insert position)
/// followed by draining every entry
fn bench_queue_schedule_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduled_queue");
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    for count in [16, 256, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || ManualClock::new(start),
                |clock| {
                    let mut queue = ScheduledQueue::with_clock(clock.clone());
                    for offset in (0..count).rev() {
                        queue
                            .schedule_in(NoOpCommand, Duration::seconds(offset))
                            .unwrap();
                    }
                    clock.advance(Duration::seconds(count));
                    black_box(queue.execute_due_at(clock.now())).unwrap();
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_invoker_press,
    bench_invoker_undo,
    bench_composite,
    bench_queue_schedule_and_drain
);
criterion_main!(benches);
