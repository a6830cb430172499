use std::{fs, path::Path};

use serde::Deserialize;

use super::{coordinate::Coordinate, sim_error::SimError};

const BUNDLED_PATH: &str = include_str!("../../assets/aircraft_path.json");

/// An ordered, closed sequence of waypoints. Always holds at least two coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPath {
    waypoints: Vec<Coordinate>,
}

#[derive(Deserialize)]
struct LineStringFeature {
    #[serde(rename = "type")]
    kind: String,
    geometry: LineStringGeometry,
}

#[derive(Deserialize)]
struct LineStringGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<Vec<f64>>,
}

impl FlightPath {
    pub fn new(waypoints: Vec<Coordinate>) -> Result<Self, SimError> {
        if waypoints.len() < 2 {
            return Err(SimError::NotEnoughWaypoints(waypoints.len()));
        }
        Ok(FlightPath { waypoints })
    }

    /// Parses a GeoJSON `Feature` whose geometry is a `LineString`.
    pub fn from_geojson(json: &str) -> Result<Self, SimError> {
        let feature: LineStringFeature = serde_json::from_str(json)?;

        if feature.kind != "Feature" {
            return Err(SimError::InvalidFlightPath(format!(
                "expected a Feature, found {}",
                feature.kind
            )));
        }
        if feature.geometry.kind != "LineString" {
            return Err(SimError::InvalidFlightPath(format!(
                "expected a LineString geometry, found {}",
                feature.geometry.kind
            )));
        }

        let waypoints = feature
            .geometry
            .coordinates
            .iter()
            .map(|position| {
                Coordinate::from_position(position).ok_or_else(|| {
                    SimError::InvalidFlightPath(format!("malformed position {:?}", position))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        FlightPath::new(waypoints)
    }

    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        let json = fs::read_to_string(path)?;
        FlightPath::from_geojson(&json)
    }

    /// The loop shipped inside the binary.
    pub fn bundled() -> Result<Self, SimError> {
        FlightPath::from_geojson(BUNDLED_PATH)
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn first(&self) -> Coordinate {
        self.waypoints[0]
    }

    /// Waypoint at `index`, wrapping around the end of the path.
    pub fn waypoint(&self, index: usize) -> Coordinate {
        self.waypoints[index % self.waypoints.len()]
    }

    /// Index that follows `index`, going back to 0 after the last waypoint.
    pub fn next_index(&self, index: usize) -> usize {
        let next = index + 1;
        if next >= self.waypoints.len() {
            0
        } else {
            next
        }
    }
}
