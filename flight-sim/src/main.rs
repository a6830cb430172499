use chrono::Utc;
use flight_sim::types::{
    config::{SimConfig, USAGE},
    listener::ConsoleListener,
    path_simulator::PathSimulator,
    sim_error::SimError,
    simulation::Simulation,
};
use logger::{Color, Level, Logger};
use std::{
    env,
    io::{self, Write},
};

fn clean_scr() {
    print!("\x1B[2J\x1B[1;1H");
    let _ = io::stdout().flush();
}

fn print_position(sim: &Simulation<ConsoleListener>) -> Result<(), SimError> {
    let snapshot = sim.snapshot()?;
    println!("Clock:    {}", snapshot.clock.format("%H:%M:%S%.3f"));
    println!(
        "State:    {}",
        if snapshot.active { "flying" } else { "paused" }
    );
    println!("Position: {}", snapshot.position);
    println!(
        "Target:   #{} {}",
        snapshot.target_index, snapshot.target
    );
    println!("Ticks:    {}", snapshot.ticks);
    Ok(())
}

fn print_speed(sim: &Simulation<ConsoleListener>) -> Result<(), SimError> {
    let snapshot = sim.snapshot()?;
    println!(
        "Speed {:.1} m/s, one update every {} ms",
        snapshot.speed,
        snapshot.interval.as_millis()
    );
    Ok(())
}

fn main() -> Result<(), SimError> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }
    let config = SimConfig::from_args(&args)?;

    let session = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let logger = Logger::new(&config.log_dir, &session)?
        .with_min_level(if config.log_to_console {
            Level::Debug
        } else {
            Level::Info
        })
        .with_console(config.log_to_console);

    // a path with fewer than two waypoints ends the run here
    let path = config.load_path()?;
    logger.info(
        &format!(
            "Loaded {} waypoints from {}",
            path.len(),
            config.path_source()
        ),
        Color::Magenta,
    )?;

    let simulator = PathSimulator::new(path, ConsoleListener::new(logger.clone()))
        .with_speed(config.speed)
        .with_interval(config.interval());

    let sim = Simulation::new(simulator, Utc::now().naive_local()).with_logger(logger.clone());
    sim.start()?;
    if config.start_active {
        sim.play()?;
    }

    loop {
        println!("Enter command (type '-h' or '--help' for options): ");
        let mut command = String::new();
        if io::stdin().read_line(&mut command)? == 0 {
            break;
        }

        let args: Vec<&str> = command.split_whitespace().collect();
        if args.is_empty() {
            continue;
        }

        let result = match args[0] {
            "play" => sim.play().map(|_| println!("Simulation playing")),
            "pause" => sim.pause().map(|_| println!("Simulation paused")),
            "toggle" => sim.toggle().map(|playing| {
                println!("Simulation {}", if playing { "playing" } else { "paused" })
            }),
            "where" => print_position(&sim),
            "speed" => print_speed(&sim),
            "-h" | "--help" | "help" => {
                print_help();
                Ok(())
            }
            "exit" => break,
            _ => {
                eprintln!("Invalid command. Use -h for help.");
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("{}", e);
            if let Err(log_error) = logger.error(&e.to_string()) {
                eprintln!("Failed to log error: {}", log_error);
            }
        }
    }

    sim.stop()?;
    logger.info(
        &format!("Log written to {}", logger.path().display()),
        Color::White,
    )?;
    Ok(())
}

fn print_help() {
    clean_scr();
    println!("Available commands:");
    println!("  play");
    println!("    Starts flying along the path.");
    println!("  pause");
    println!("    Holds the aircraft where it is.");
    println!("  toggle");
    println!("    Switches between play and pause.");
    println!("  where");
    println!("    Shows the current position and the waypoint being flown to.");
    println!("  speed");
    println!("    Shows the ground speed and update interval.");
    println!("  exit");
    println!("    Closes this application.");
}
