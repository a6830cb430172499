use std::fmt;

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate from a GeoJSON position, which is `[longitude, latitude, ...]`.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [longitude, latitude, ..] => Some(Coordinate::new(*latitude, *longitude)),
            _ => None,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Velocity in metres per second. `x` points north, `y` east, `z` up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Velocity {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Velocity { x, y, z }
    }

    /// Horizontal velocity for a ground speed flown along `bearing_degrees`.
    pub fn from_bearing(speed: f64, bearing_degrees: f64) -> Self {
        let bearing = bearing_degrees.to_radians();
        Velocity::new(
            (bearing.cos() * speed) as f32,
            (bearing.sin() * speed) as f32,
            0.0,
        )
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}
