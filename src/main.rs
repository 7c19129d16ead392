use chrono::Duration;
use remote_commander::command::{
    CeilingFanCommand, DimLightCommand, GarageDoorCloseCommand, GarageDoorOpenCommand,
    LightOffCommand, LightOnCommand, SetTemperatureCommand, SetThermostatModeCommand,
    StereoOffCommand, StereoOnCommand,
};
use remote_commander::devices::{self, CeilingFan, GarageDoor, Light, Stereo, Thermostat};
use remote_commander::{
    Clock, CommanderConfig, CompositeCommand, ConfigError, Device, Invoker, ManualClock,
    ScheduledQueue, SharedCommand, device,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Slot layout of the demo remote
const LIGHT_SLOT: usize = 0;
const FAN_SLOT: usize = 1;
const GARAGE_SLOT: usize = 2;
const STEREO_SLOT: usize = 3;
const PARTY_SLOT: usize = 4;

// The scheduled queue is polled every quarter hour of simulated time
const POLL_INTERVAL_MINUTES: i64 = 15;
const POLL_COUNT: usize = 8;

struct House {
    light: Device<Light>,
    fan: Device<CeilingFan>,
    door: Device<GarageDoor>,
    stereo: Device<Stereo>,
    thermostat: Device<Thermostat>,
}

impl House {
    fn new() -> Self {
        Self {
            light: device(Light::new("Living Room light")),
            fan: device(CeilingFan::new("Living Room fan")),
            door: device(GarageDoor::new("Garage door")),
            stereo: device(Stereo::new("Living Room stereo")),
            thermostat: device(Thermostat::new("Hallway thermostat")),
        }
    }

    fn print(&self) {
        let light = devices::lock(&self.light);
        let stereo = devices::lock(&self.stereo);
        let thermostat = devices::lock(&self.thermostat);
        println!(
            "  light: {} ({}%) | fan: {} | garage: {} | stereo: {} ({}, vol {}) | thermostat: {:.1}°C {}",
            if light.is_on() { "on" } else { "off" },
            light.level(),
            devices::lock(&self.fan).speed(),
            if devices::lock(&self.door).is_open() { "open" } else { "closed" },
            if stereo.is_on() { "on" } else { "off" },
            stereo.input(),
            stereo.volume(),
            thermostat.temperature(),
            thermostat.mode()
        );
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn load_config() -> Result<CommanderConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading configuration from {}", path);
            CommanderConfig::load(path)
        }
        None => Ok(CommanderConfig::default()),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Remote Commander ===\n");

    let config = load_config()?;
    let house = House::new();
    let mut remote = Invoker::with_config(&config.invoker)?;

    configure_remote(&mut remote, &house)?;
    drive_remote(&mut remote, &house)?;

    println!("\nRemote state:");
    println!("{}", serde_json::to_string_pretty(&remote.snapshot())?);

    run_schedule(&config, &house)?;

    println!("\n=== Done ===");
    Ok(())
}

fn configure_remote(remote: &mut Invoker, house: &House) -> Result<(), Box<dyn std::error::Error>> {
    remote.configure_slot(
        LIGHT_SLOT,
        SharedCommand::new(LightOnCommand::new(house.light.clone())),
        SharedCommand::new(LightOffCommand::new(house.light.clone())),
    )?;
    remote.configure_slot(
        FAN_SLOT,
        SharedCommand::new(CeilingFanCommand::high(house.fan.clone())),
        SharedCommand::new(CeilingFanCommand::off(house.fan.clone())),
    )?;
    remote.configure_slot(
        GARAGE_SLOT,
        SharedCommand::new(GarageDoorOpenCommand::new(house.door.clone())),
        SharedCommand::new(GarageDoorCloseCommand::new(house.door.clone())),
    )?;
    remote.configure_slot(
        STEREO_SLOT,
        SharedCommand::new(StereoOnCommand::new(house.stereo.clone(), "cd", 11)),
        SharedCommand::new(StereoOffCommand::new(house.stereo.clone())),
    )?;

    let party_on = CompositeCommand::new("Party mode")
        .then(DimLightCommand::new(house.light.clone(), 30))
        .then(StereoOnCommand::new(house.stereo.clone(), "radio", 8))
        .then(CeilingFanCommand::medium(house.fan.clone()));
    let party_off = CompositeCommand::new("Party over")
        .then(StereoOffCommand::new(house.stereo.clone()))
        .then(CeilingFanCommand::off(house.fan.clone()))
        .then(LightOffCommand::new(house.light.clone()));
    remote.configure_slot(
        PARTY_SLOT,
        SharedCommand::new(party_on),
        SharedCommand::new(party_off),
    )?;

    println!("Remote configured with {} slots:", remote.slot_count());
    for slot in 0..remote.slot_count() {
        let (on, off) = remote.slot_descriptions(slot)?;
        println!("  [{}] {} / {}", slot, on, off);
    }
    Ok(())
}

fn drive_remote(remote: &mut Invoker, house: &House) -> Result<(), Box<dyn std::error::Error>> {
    println!("\nPressing buttons...");
    remote.press_on(LIGHT_SLOT)?;
    remote.press_on(FAN_SLOT)?;
    remote.press_on(STEREO_SLOT)?;
    house.print();

    remote.press_off(STEREO_SLOT)?;
    remote.press_on(PARTY_SLOT)?;
    house.print();

    println!("\nUndo: {}", remote.undo()?);
    house.print();
    println!("Redo: {}", remote.redo()?);
    house.print();

    println!("\nOpening the garage, then something blocks the door...");
    remote.press_on(GARAGE_SLOT)?;
    devices::lock(&house.door).set_obstructed(true);
    match remote.undo() {
        Ok(description) => println!("Undo: {}", description),
        Err(e) => println!("Undo refused: {}", e),
    }
    devices::lock(&house.door).set_obstructed(false);
    house.print();

    Ok(())
}

fn run_schedule(config: &CommanderConfig, house: &House) -> Result<(), Box<dyn std::error::Error>> {
    println!("\nScheduling the evening...");

    let clock = ManualClock::default();
    let mut queue = ScheduledQueue::with_config(clock.clone(), &config.queue);

    queue.schedule_in(
        SetThermostatModeCommand::new(house.thermostat.clone(), "heat"),
        Duration::minutes(30),
    )?;
    queue.schedule_in(
        SetTemperatureCommand::new(house.thermostat.clone(), 21.5),
        Duration::minutes(30),
    )?;
    queue.schedule_in(
        SetTemperatureCommand::new(house.thermostat.clone(), 40.0),
        Duration::minutes(60),
    )?;
    queue.schedule_in(
        GarageDoorCloseCommand::new(house.door.clone()),
        Duration::minutes(75),
    )?;
    queue.schedule_in(
        LightOffCommand::new(house.light.clone()),
        Duration::minutes(90),
    )?;

    for entry in queue.entries() {
        println!("  {} {}", entry.scheduled_at().format("%H:%M"), entry.describe());
    }

    for _ in 0..POLL_COUNT {
        clock.advance(Duration::minutes(POLL_INTERVAL_MINUTES));
        match queue.execute_due() {
            Ok(0) => {}
            Ok(count) => println!("{}: executed {}", clock.now().format("%H:%M"), count),
            Err(e) => {
                println!(
                    "{}: executed {} before failure: {}",
                    clock.now().format("%H:%M"),
                    e.executed_count().unwrap_or(0),
                    e
                );
                // Resolve by dropping the failing entry; later entries run on the next poll
                let failed = queue.peek()?.id();
                queue.cancel(failed);
            }
        }
    }

    house.print();
    println!("{} scheduled command(s) left", queue.len());
    Ok(())
}
