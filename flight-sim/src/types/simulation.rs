use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDateTime;
use logger::{Color, Logger};

use super::coordinate::Coordinate;
use super::listener::SimulatorListener;
use super::path_simulator::{PathSimulator, Step};
use super::sim_error::SimError;
use super::timer::Timer;

/// Point-in-time view of the simulation for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub clock: NaiveDateTime,
    pub position: Coordinate,
    pub target: Coordinate,
    pub target_index: usize,
    pub active: bool,
    pub ticks: u64,
    pub speed: f64,
    pub interval: Duration,
}

/// Drives a [`PathSimulator`] from a [`Timer`].
///
/// The simulator lives behind a mutex so the console can play, pause and
/// inspect it between ticks. Every tick runs on the timer thread.
pub struct Simulation<L: SimulatorListener + Send + 'static> {
    pub simulator: Arc<Mutex<PathSimulator<L>>>,
    pub timer: Arc<Timer>,
    logger: Option<Logger>,
}

impl<L: SimulatorListener + Send + 'static> Simulation<L> {
    /// Create a new simulation whose clock starts at `start_time`
    pub fn new(simulator: PathSimulator<L>, start_time: NaiveDateTime) -> Self {
        let timer = Timer::new(start_time, simulator.interval());
        Simulation {
            simulator: Arc::new(Mutex::new(simulator)),
            timer,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Start ticking. The aircraft only moves once [`Simulation::play`] is called.
    pub fn start(&self) -> Result<(), SimError> {
        let simulator = Arc::clone(&self.simulator);
        let logger = self.logger.clone();

        self.timer.start(move |current_time, tick_count| {
            let step = match simulator.lock() {
                Ok(mut simulator) => simulator.tick(),
                Err(_) => {
                    match &logger {
                        Some(logger) => {
                            if let Err(e) = logger.error("Failed to lock simulator. Skipping tick.") {
                                eprintln!("Failed to log lock error: {}", e);
                            }
                        }
                        None => eprintln!("Failed to lock simulator. Skipping tick."),
                    }
                    return;
                }
            };

            if let (Some(step), Some(logger)) = (step, &logger) {
                log_step(logger, current_time, tick_count, &step);
            }
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, PathSimulator<L>>, SimError> {
        self.simulator
            .lock()
            .map_err(|_| SimError::LockError("Failed to lock simulator.".to_string()))
    }

    pub fn play(&self) -> Result<(), SimError> {
        self.lock()?.start();
        if let Some(logger) = &self.logger {
            logger.info("Simulation playing", Color::Blue)?;
        }
        Ok(())
    }

    pub fn pause(&self) -> Result<(), SimError> {
        self.lock()?.pause();
        if let Some(logger) = &self.logger {
            logger.info("Simulation paused", Color::Yellow)?;
        }
        Ok(())
    }

    /// Flips between playing and paused, returning whether it is now playing.
    pub fn toggle(&self) -> Result<bool, SimError> {
        let active = self.lock()?.is_active();
        if active {
            self.pause()?;
        } else {
            self.play()?;
        }
        Ok(!active)
    }

    pub fn snapshot(&self) -> Result<Snapshot, SimError> {
        let clock = *self
            .timer
            .current_time
            .lock()
            .map_err(|_| SimError::LockError("Failed to lock the clock.".to_string()))?;
        let simulator = self.lock()?;

        Ok(Snapshot {
            clock,
            position: simulator.position(),
            target: simulator.target(),
            target_index: simulator.target_index(),
            active: simulator.is_active(),
            ticks: simulator.ticks(),
            speed: simulator.speed(),
            interval: simulator.interval(),
        })
    }

    /// Stop the timer thread.
    pub fn stop(&self) -> Result<(), SimError> {
        self.timer.stop()
    }
}

impl<L: SimulatorListener + Send + 'static> Drop for Simulation<L> {
    fn drop(&mut self) {
        if let Err(e) = self.timer.stop() {
            eprintln!("Failed to stop the timer: {}", e);
        }
    }
}

fn log_step(logger: &Logger, current_time: NaiveDateTime, tick_count: usize, step: &Step) {
    let message = format!(
        "[{}] tick {}: moved {:.2} m heading {:.1} to {}",
        current_time.format("%H:%M:%S%.3f"),
        tick_count,
        step.distance,
        step.bearing,
        step.position
    );
    if let Err(e) = logger.debug(&message) {
        eprintln!("Failed to log tick: {}", e);
    }
    if step.reached_target {
        let message = format!("Waypoint reached, next target #{}", step.target_index);
        if let Err(e) = logger.info(&message, Color::Green) {
            eprintln!("Failed to log waypoint: {}", e);
        }
    }
}
