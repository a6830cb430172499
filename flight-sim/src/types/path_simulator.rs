use std::time::Duration;

use super::{
    coordinate::{Coordinate, Velocity},
    flight_path::FlightPath,
    geodesy::{bearing, destination, haversine_distance},
    listener::SimulatorListener,
};

/// Ground speed in metres per second.
pub const DEFAULT_SPEED: f64 = 14.0;
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

/// Leftover distance, in metres, that still counts as having reached a waypoint.
pub const ARRIVAL_TOLERANCE: f64 = 1e-6;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub position: Coordinate,
    pub bearing: f64,
    /// Metres moved during this tick.
    pub distance: f64,
    pub reached_target: bool,
    /// Waypoint being flown to after this tick.
    pub target_index: usize,
}

/// Flies a point around a closed flight path at constant ground speed.
///
/// Each call to [`PathSimulator::tick`] stands for one interval of flight. The
/// listener hears about the new position and then the new velocity.
pub struct PathSimulator<L: SimulatorListener> {
    path: FlightPath,
    listener: L,
    position: Coordinate,
    target_index: usize,
    speed: f64,
    interval: Duration,
    active: bool,
    ticks: u64,
}

impl<L: SimulatorListener> PathSimulator<L> {
    /// Starts paused at the first waypoint, heading for the second.
    pub fn new(path: FlightPath, listener: L) -> Self {
        let position = path.first();
        PathSimulator {
            path,
            listener,
            position,
            target_index: 1,
            speed: DEFAULT_SPEED,
            interval: DEFAULT_INTERVAL,
            active: false,
            ticks: 0,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn pause(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advances one interval. Does nothing and returns `None` while paused.
    pub fn tick(&mut self) -> Option<Step> {
        if !self.active {
            return None;
        }

        let target = self.target();
        let distance_per_interval = self.distance_per_interval();

        let distance_to_target = haversine_distance(self.position, target);
        // never fly past the target
        let distance = distance_to_target.min(distance_per_interval);
        let heading = bearing(self.position, target);

        self.position = destination(self.position, distance, heading);
        self.listener.on_position_changed(self.position, Some(0.0));
        self.listener
            .on_speed_change(Velocity::from_bearing(self.speed, heading));

        let reached_target = distance_to_target <= distance_per_interval + ARRIVAL_TOLERANCE;
        if reached_target {
            self.target_index = self.path.next_index(self.target_index);
        }
        self.ticks += 1;

        Some(Step {
            position: self.position,
            bearing: heading,
            distance,
            reached_target,
            target_index: self.target_index,
        })
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn target(&self) -> Coordinate {
        self.path.waypoint(self.target_index)
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn distance_per_interval(&self) -> f64 {
        self.speed * self.interval.as_secs_f64()
    }

    /// Ticks that actually moved the aircraft.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn path(&self) -> &FlightPath {
        &self.path
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        positions: Vec<(Coordinate, Option<f64>)>,
        velocities: Vec<Velocity>,
    }

    impl SimulatorListener for Recorder {
        fn on_position_changed(&mut self, coordinate: Coordinate, altitude_agl: Option<f64>) {
            self.positions.push((coordinate, altitude_agl));
        }

        fn on_speed_change(&mut self, velocity: Velocity) {
            self.velocities.push(velocity);
        }
    }

    fn equator_path() -> FlightPath {
        FlightPath::new(vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)]).unwrap()
    }

    #[test]
    fn test_new_simulator_is_paused_at_first_waypoint() {
        let sim = PathSimulator::new(equator_path(), Recorder::default());
        assert!(!sim.is_active());
        assert_eq!(sim.position(), Coordinate::new(0.0, 0.0));
        assert_eq!(sim.target(), Coordinate::new(0.0, 1.0));
        assert_eq!(sim.target_index(), 1);
        assert!((sim.distance_per_interval() - 2.8).abs() < 1e-9);
    }

    #[test]
    fn test_paused_simulator_does_not_tick() {
        let mut sim = PathSimulator::new(equator_path(), Recorder::default());
        assert_eq!(sim.tick(), None);

        sim.start();
        assert!(sim.tick().is_some());
        sim.pause();
        assert_eq!(sim.tick(), None);

        assert_eq!(sim.listener().positions.len(), 1);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_tick_moves_by_speed_times_interval() {
        let mut sim = PathSimulator::new(equator_path(), Recorder::default());
        sim.start();

        let step = sim.tick().unwrap();

        assert!((step.distance - 2.8).abs() < 1e-9);
        assert!((step.bearing - 90.0).abs() < 1e-9);
        assert!(!step.reached_target);
        let moved = haversine_distance(Coordinate::new(0.0, 0.0), step.position);
        assert!((moved - 2.8).abs() < 1e-6);
    }

    #[test]
    fn test_listener_gets_position_then_velocity() {
        let mut sim = PathSimulator::new(equator_path(), Recorder::default());
        sim.start();
        sim.tick();

        let recorder = sim.listener();
        assert_eq!(recorder.positions.len(), 1);
        assert_eq!(recorder.positions[0].1, Some(0.0));
        let velocity = recorder.velocities[0];
        assert!(velocity.x.abs() < 1e-5);
        assert!((velocity.y - 14.0).abs() < 1e-5);
        assert_eq!(velocity.z, 0.0);
    }

    #[test]
    fn test_fast_tick_reaches_target_and_wraps() {
        let mut sim = PathSimulator::new(equator_path(), Recorder::default())
            .with_speed(1_000_000.0)
            .with_interval(Duration::from_secs(1));
        sim.start();

        let step = sim.tick().unwrap();

        assert!(step.reached_target);
        assert!(step.position.latitude.abs() < 1e-9);
        assert!((step.position.longitude - 1.0).abs() < 1e-9);
        assert_eq!(sim.target_index(), 0);
        assert_eq!(sim.target(), Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn test_loops_through_every_waypoint() {
        let path = FlightPath::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.001),
            Coordinate::new(0.001, 0.001),
        ])
        .unwrap();
        let mut sim = PathSimulator::new(path, Recorder::default()).with_speed(10_000.0);
        sim.start();

        let targets: Vec<usize> = (0..4).filter_map(|_| sim.tick()).map(|s| s.target_index).collect();
        assert_eq!(targets, vec![2, 0, 1, 2]);
    }

    #[test]
    fn test_rounding_leftover_counts_as_arrival() {
        let from = Coordinate::new(0.0, 0.0);
        let to = Coordinate::new(0.0, 0.0137);
        let path = FlightPath::new(vec![from, to]).unwrap();
        let speed = haversine_distance(from, to) / 2.0 / DEFAULT_INTERVAL.as_secs_f64();
        let mut sim = PathSimulator::new(path, Recorder::default()).with_speed(speed);
        sim.start();

        assert!(!sim.tick().unwrap().reached_target);
        let second = sim.tick().unwrap();
        assert!(second.reached_target);
        assert!(haversine_distance(second.position, to) <= ARRIVAL_TOLERANCE);
        assert_eq!(sim.target_index(), 0);
    }
}
