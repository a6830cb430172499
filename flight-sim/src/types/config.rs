use std::path::PathBuf;
use std::time::Duration;

use super::flight_path::FlightPath;
use super::path_simulator::{DEFAULT_INTERVAL, DEFAULT_SPEED};
use super::sim_error::SimError;

const MAX_INTERVAL_MILLIS: u64 = 10000;

pub const USAGE: &str =
    "Usage: simulator [--path <file>] [--speed <m/s>] [--interval <ms>] [--log-dir <dir>] [--verbose] [--autoplay]";

/// Settings for one run of the simulator, taken from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Path file given with `--path`. `None` flies the bundled path.
    pub path_file: Option<PathBuf>,
    pub speed: f64,
    pub interval_millis: u64,
    pub log_dir: PathBuf,
    pub log_to_console: bool,
    pub start_active: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            path_file: None,
            speed: DEFAULT_SPEED,
            interval_millis: DEFAULT_INTERVAL.as_millis() as u64,
            log_dir: PathBuf::from("logs"),
            log_to_console: false,
            start_active: false,
        }
    }
}

impl SimConfig {
    /// Parses the arguments that follow the program name.
    pub fn from_args(args: &[String]) -> Result<Self, SimError> {
        let mut config = SimConfig::default();
        let mut args = args.iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--path" => config.path_file = Some(PathBuf::from(value_of(arg, args.next())?)),
                "--speed" => {
                    let value = value_of(arg, args.next())?;
                    config.speed = value
                        .parse()
                        .map_err(|_| SimError::InvalidConfig(format!("speed '{}'", value)))?;
                }
                "--interval" => {
                    let value = value_of(arg, args.next())?;
                    config.interval_millis = value
                        .parse()
                        .map_err(|_| SimError::InvalidConfig(format!("interval '{}'", value)))?;
                }
                "--log-dir" => config.log_dir = PathBuf::from(value_of(arg, args.next())?),
                "--verbose" | "-v" => config.log_to_console = true,
                "--autoplay" => config.start_active = true,
                other => {
                    return Err(SimError::InvalidConfig(format!(
                        "unknown argument '{}'. {}",
                        other, USAGE
                    )))
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "speed must be a positive number, got {}",
                self.speed
            )));
        }
        if self.interval_millis == 0 || self.interval_millis > MAX_INTERVAL_MILLIS {
            return Err(SimError::InvalidConfig(format!(
                "interval must be between 1 and {} ms, got {}",
                MAX_INTERVAL_MILLIS, self.interval_millis
            )));
        }
        Ok(())
    }

    pub fn load_path(&self) -> Result<FlightPath, SimError> {
        match &self.path_file {
            Some(file) => FlightPath::from_file(file),
            None => FlightPath::bundled(),
        }
    }

    /// Where the flight path comes from, for log messages.
    pub fn path_source(&self) -> String {
        match &self.path_file {
            Some(file) => file.display().to_string(),
            None => "the bundled path".to_string(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_millis)
    }
}

fn value_of<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a str, SimError> {
    value
        .map(String::as_str)
        .ok_or_else(|| SimError::InvalidConfig(format!("{} needs a value", flag)))
}
