//! Spherical-earth helpers used to move the simulated aircraft.

use super::coordinate::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Converts a ground distance in metres into an angular distance in radians.
pub fn distance_to_radians(meters: f64) -> f64 {
    (meters / 1000.0) / EARTH_RADIUS_KM
}

/// Great-circle distance between two coordinates, in metres.
pub fn haversine_distance(from: Coordinate, to: Coordinate) -> f64 {
    let from_lat = from.latitude.to_radians();
    let to_lat = to.latitude.to_radians();

    let delta_lat = to_lat - from_lat;
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + from_lat.cos() * to_lat.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c * 1000.0
}

/// Initial course from `from` to `to`, in degrees clockwise from north.
///
/// The result is in `(-180, 180]`; callers that need `[0, 360)` normalise it themselves.
pub fn bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    y.atan2(x).to_degrees()
}

/// Point reached after travelling `meters` from `origin` along `bearing_degrees`.
pub fn destination(origin: Coordinate, meters: f64, bearing_degrees: f64) -> Coordinate {
    let from_lat = origin.latitude.to_radians();
    let from_lon = origin.longitude.to_radians();
    let bearing = bearing_degrees.to_radians();
    let distance = distance_to_radians(meters);

    let to_lat = (from_lat.sin() * distance.cos()
        + from_lat.cos() * distance.sin() * bearing.cos())
    .asin();
    let to_lon = from_lon
        + (bearing.sin() * distance.sin() * from_lat.cos())
            .atan2(distance.cos() - from_lat.sin() * to_lat.sin());

    Coordinate::new(to_lat.to_degrees(), to_lon.to_degrees())
}
