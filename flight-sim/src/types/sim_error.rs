use std::fmt;

/// Represents errors that can occur in the flight simulator application.
#[derive(Debug)]
pub enum SimError {
    NotEnoughWaypoints(usize), // A flight path needs at least two coordinates
    InvalidFlightPath(String), // The path file is not a LineString feature
    InvalidConfig(String),     // Bad command line value
    LockError(String),
    TimerStartError(String),
    Other(String), // Generic error case with a custom message
    Io(std::io::Error),
    Json(serde_json::Error),
    Logger(logger::LoggerError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::NotEnoughWaypoints(count) => write!(
                f,
                "Flight simulator expects a line string with more than 1 coordinate, got {}",
                count
            ),
            SimError::InvalidFlightPath(msg) => write!(f, "Invalid flight path: {}", msg),
            SimError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            SimError::LockError(msg) => write!(f, "Lock error: {}", msg),
            SimError::TimerStartError(msg) => write!(f, "Timer start error: {}", msg),
            SimError::Other(msg) => write!(f, "Error: {}", msg),
            SimError::Io(e) => write!(f, "I/O error: {}", e),
            SimError::Json(e) => write!(f, "JSON error: {}", e),
            SimError::Logger(e) => write!(f, "Logger error: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            SimError::Json(e) => Some(e),
            SimError::Logger(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Io(err)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Json(err)
    }
}

impl From<logger::LoggerError> for SimError {
    fn from(err: logger::LoggerError) -> Self {
        SimError::Logger(err)
    }
}
