use super::{
    airspace::AirspaceObject,
    coordinate::{Coordinate, Velocity},
};

/// How close the aircraft is to an airspace. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Approaching,
    Entering,
    Intersecting,
}

impl Level {
    pub fn as_str(&self) -> &str {
        match self {
            Level::Approaching => "approaching",
            Level::Entering => "entering",
            Level::Intersecting => "intersecting",
        }
    }
}

/// Metrics that come with a status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusContext {
    /// Metres to the airspace boundary.
    pub distance_to: f64,
    /// Seconds until the boundary is reached at the current velocity, if it ever is.
    pub time_to: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeofencingStatus {
    pub level: Level,
    pub airspace: AirspaceObject,
    pub context: StatusContext,
}

impl GeofencingStatus {
    pub fn new(level: Level, airspace: AirspaceObject, context: StatusContext) -> Self {
        GeofencingStatus {
            level,
            airspace,
            context,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.airspace.name()
    }
}

/// The external engine that turns aircraft updates into airspace statuses.
///
/// An evaluator is built over an
/// [`AirspaceSource`](super::airspace::AirspaceSource), usually a
/// [`MapAirspaceSource`](super::airspace::MapAirspaceSource) reading the
/// map on screen, and asks it for airspaces around each new position.
/// [`GeofenceBridge`](super::listener::GeofenceBridge) connects the result to
/// a simulator.
pub trait GeofenceEvaluator {
    fn on_position_changed(&mut self, coordinate: Coordinate, altitude_agl: Option<f64>);

    fn on_speed_change(&mut self, velocity: Velocity);

    /// Statuses for the latest known position and velocity.
    fn statuses(&self) -> Vec<GeofencingStatus>;
}
