//! Flies a simulated drone around a closed flight path and reports its
//! position and velocity on a fixed cadence, for feeding a geofence evaluator.

pub mod types;

pub use types::airspace::{AirspaceObject, AirspaceSource, MapAirspaceSource, MapView};
pub use types::config::SimConfig;
pub use types::coordinate::{Coordinate, Velocity};
pub use types::flight_path::FlightPath;
pub use types::geofence::{GeofenceEvaluator, GeofencingStatus, Level, StatusContext};
pub use types::listener::{ConsoleListener, GeofenceBridge, SimulatorListener};
pub use types::path_simulator::{PathSimulator, Step};
pub use types::sim_error::SimError;
pub use types::simulation::{Simulation, Snapshot};
pub use types::status_board::{aggregate, StatusBoard, StatusBuckets, StatusRow};
