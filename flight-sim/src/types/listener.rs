use std::sync::{Arc, Mutex};

use logger::{Color, Logger};

use super::{
    coordinate::{Coordinate, Velocity},
    geofence::GeofenceEvaluator,
    status_board::StatusBoard,
};

/// Receives the updates produced by each simulator tick.
///
/// Both methods are called synchronously from the tick, position first.
pub trait SimulatorListener {
    fn on_position_changed(&mut self, coordinate: Coordinate, altitude_agl: Option<f64>);

    fn on_speed_change(&mut self, velocity: Velocity);
}

/// Writes every update to the session log.
pub struct ConsoleListener {
    logger: Logger,
}

impl ConsoleListener {
    pub fn new(logger: Logger) -> Self {
        ConsoleListener { logger }
    }
}

impl SimulatorListener for ConsoleListener {
    fn on_position_changed(&mut self, coordinate: Coordinate, altitude_agl: Option<f64>) {
        let altitude = altitude_agl.map_or("-".to_string(), |a| format!("{:.1} m", a));
        let message = format!("Position {} agl {}", coordinate, altitude);
        if let Err(e) = self.logger.info(&message, Color::Cyan) {
            eprintln!("Failed to log position: {}", e);
        }
    }

    fn on_speed_change(&mut self, velocity: Velocity) {
        let message = format!(
            "Velocity ({:.2}, {:.2}, {:.2}) m/s",
            velocity.x, velocity.y, velocity.z
        );
        if let Err(e) = self.logger.debug(&message) {
            eprintln!("Failed to log velocity: {}", e);
        }
    }
}

/// Forwards aircraft updates to a geofence evaluator and publishes the
/// statuses it reports after every position change.
pub struct GeofenceBridge<E: GeofenceEvaluator> {
    evaluator: E,
    board: Arc<Mutex<StatusBoard>>,
}

impl<E: GeofenceEvaluator> GeofenceBridge<E> {
    pub fn new(evaluator: E) -> Self {
        GeofenceBridge {
            evaluator,
            board: Arc::new(Mutex::new(StatusBoard::new())),
        }
    }

    /// Shared handle to the board, readable while the simulation runs.
    pub fn board(&self) -> Arc<Mutex<StatusBoard>> {
        Arc::clone(&self.board)
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}

impl<E: GeofenceEvaluator> SimulatorListener for GeofenceBridge<E> {
    fn on_position_changed(&mut self, coordinate: Coordinate, altitude_agl: Option<f64>) {
        self.evaluator.on_position_changed(coordinate, altitude_agl);
        let statuses = self.evaluator.statuses();
        match self.board.lock() {
            Ok(mut board) => board.update(statuses),
            Err(_) => eprintln!("Failed to lock status board. Dropping statuses."),
        }
    }

    fn on_speed_change(&mut self, velocity: Velocity) {
        self.evaluator.on_speed_change(velocity);
    }
}

/// Sends each update to both listeners, `A` first.
impl<A: SimulatorListener, B: SimulatorListener> SimulatorListener for (A, B) {
    fn on_position_changed(&mut self, coordinate: Coordinate, altitude_agl: Option<f64>) {
        self.0.on_position_changed(coordinate, altitude_agl);
        self.1.on_position_changed(coordinate, altitude_agl);
    }

    fn on_speed_change(&mut self, velocity: Velocity) {
        self.0.on_speed_change(velocity);
        self.1.on_speed_change(velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::airspace::{AirspaceObject, EvaluationType};
    use crate::types::geofence::{GeofencingStatus, Level, StatusContext};
    use serde_json::{json, Map, Value};
    use std::fs;

    /// Flags anything within a degree of latitude of the equator as intersecting.
    #[derive(Default)]
    struct EquatorEvaluator {
        position: Option<Coordinate>,
        velocity: Option<Velocity>,
    }

    impl GeofenceEvaluator for EquatorEvaluator {
        fn on_position_changed(&mut self, coordinate: Coordinate, _altitude_agl: Option<f64>) {
            self.position = Some(coordinate);
        }

        fn on_speed_change(&mut self, velocity: Velocity) {
            self.velocity = Some(velocity);
        }

        fn statuses(&self) -> Vec<GeofencingStatus> {
            let Some(position) = self.position else {
                return Vec::new();
            };
            if position.latitude.abs() > 1.0 {
                return Vec::new();
            }
            let mut attributes = Map::new();
            attributes.insert("name".to_string(), json!("Equator"));
            let status = GeofencingStatus::new(
                Level::Intersecting,
                AirspaceObject::new(Value::Null, attributes, EvaluationType::Fence),
                StatusContext {
                    distance_to: 0.0,
                    time_to: None,
                },
            );
            vec![status.clone(), status]
        }
    }

    #[derive(Default)]
    struct Counter {
        positions: usize,
        speeds: usize,
    }

    impl SimulatorListener for Counter {
        fn on_position_changed(&mut self, _coordinate: Coordinate, _altitude_agl: Option<f64>) {
            self.positions += 1;
        }

        fn on_speed_change(&mut self, _velocity: Velocity) {
            self.speeds += 1;
        }
    }

    #[test]
    fn test_bridge_publishes_statuses_on_position_change() {
        let mut bridge = GeofenceBridge::new(EquatorEvaluator::default());
        let board = bridge.board();

        bridge.on_position_changed(Coordinate::new(0.5, 10.0), Some(0.0));
        assert_eq!(board.lock().unwrap().intersecting().len(), 1);

        bridge.on_position_changed(Coordinate::new(5.0, 10.0), Some(0.0));
        assert!(board.lock().unwrap().intersecting().is_empty());
        assert_eq!(board.lock().unwrap().updates(), 2);
    }

    #[test]
    fn test_bridge_forwards_velocity() {
        let mut bridge = GeofenceBridge::new(EquatorEvaluator::default());
        bridge.on_speed_change(Velocity::new(1.0, 2.0, 0.0));
        assert_eq!(bridge.evaluator().velocity, Some(Velocity::new(1.0, 2.0, 0.0)));
        assert_eq!(bridge.board().lock().unwrap().updates(), 0);
    }

    #[test]
    fn test_pair_fans_out() {
        let mut pair = (Counter::default(), Counter::default());
        pair.on_position_changed(Coordinate::new(0.0, 0.0), None);
        pair.on_speed_change(Velocity::default());
        assert_eq!((pair.0.positions, pair.0.speeds), (1, 1));
        assert_eq!((pair.1.positions, pair.1.speeds), (1, 1));
    }

    #[test]
    fn test_console_listener_writes_to_log() {
        let dir = std::env::temp_dir().join(format!("console_listener_{}", std::process::id()));
        let log = Logger::new(&dir, "listener")
            .unwrap()
            .with_min_level(logger::Level::Debug);
        let mut listener = ConsoleListener::new(log.clone());

        listener.on_position_changed(Coordinate::new(1.0, 2.0), Some(0.0));
        listener.on_speed_change(Velocity::new(14.0, 0.0, 0.0));

        let contents = fs::read_to_string(log.path()).unwrap();
        assert!(contents.contains("Position (1.000000, 2.000000) agl 0.0 m"));
        assert!(contents.contains("Velocity (14.00, 0.00, 0.00) m/s"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
