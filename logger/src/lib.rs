use chrono::Utc;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Severity of a log entry. Entries below the logger's minimum level are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Debug => "[DEBUG]",
            Level::Info => "[INFO]",
            Level::Warn => "[WARN]",
            Level::Error => "[ERROR]",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl Color {
    fn to_ansi_code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Blue => "\x1b[34m",
            Color::Yellow => "\x1b[33m",
            Color::Cyan => "\x1b[36m",
            Color::Magenta => "\x1b[35m",
            Color::White => "\x1b[37m",
        }
    }
}

/// Appends timestamped entries to a per-session log file, optionally echoing
/// them to stdout with ANSI colors.
#[derive(Debug, Clone)]
pub struct Logger {
    log_file: PathBuf,
    min_level: Level,
    to_console: bool,
}

impl Logger {
    /// Creates a new `Logger` writing to `<log_dir>/sim_<session>.log`.
    ///
    /// The directory is created if missing. An existing file for the same
    /// session is truncated.
    ///
    /// # Parameters
    /// - `log_dir`: Directory that holds the log files.
    /// - `session`: Label used in the file name. Characters that are not
    ///   alphanumeric, `-` or `_` are replaced with `_`.
    pub fn new(log_dir: &Path, session: &str) -> Result<Self, LoggerError> {
        if log_dir.exists() && !log_dir.is_dir() {
            return Err(LoggerError::InvalidPath(format!(
                "{} is not a directory",
                log_dir.display()
            )));
        }
        std::fs::create_dir_all(log_dir)?;

        let log_file = log_dir.join(format!("sim_{}.log", sanitize(session)));

        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&log_file)?;

        Ok(Logger {
            log_file,
            min_level: Level::Info,
            to_console: false,
        })
    }

    /// Sets the lowest level that gets written.
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Echo every written entry to stdout as well.
    pub fn with_console(mut self, to_console: bool) -> Self {
        self.to_console = to_console;
        self
    }

    pub fn path(&self) -> &Path {
        &self.log_file
    }

    fn log(&self, level: Level, color: Option<Color>, message: &str) -> Result<(), LoggerError> {
        if level < self.min_level {
            return Ok(());
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = format!("{} [{}]: {}\n", level.tag(), timestamp, message);

        if self.to_console {
            let ansi = match (level, color) {
                (Level::Warn, _) => "\x1b[93m",
                (Level::Error, _) => "\x1b[91m",
                (_, Some(color)) => color.to_ansi_code(),
                (_, None) => Color::White.to_ansi_code(),
            };
            print!("{}{}\x1b[0m", ansi, line);
            io::stdout().flush()?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    pub fn debug(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Debug, None, message)
    }

    /// Logs an informational message, colored with `color` on the console.
    pub fn info(&self, message: &str, color: Color) -> Result<(), LoggerError> {
        self.log(Level::Info, Some(color), message)
    }

    pub fn warn(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Warn, None, message)
    }

    pub fn error(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Error, None, message)
    }
}

fn sanitize(session: &str) -> String {
    session
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[derive(Debug)]
pub enum LoggerError {
    IoError(std::io::Error),
    InvalidPath(String),
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::IoError(e) => write!(f, "I/O Error: {}", e),
            LoggerError::InvalidPath(msg) => write!(f, "Invalid Path: {}", msg),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::IoError(e) => Some(e),
            LoggerError::InvalidPath(_) => None,
        }
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(err: std::io::Error) -> Self {
        LoggerError::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("logger_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_logger_creation_and_logging() {
        let log_dir = scratch_dir("creation");
        let logger = Logger::new(&log_dir, "demo flight").expect("Failed to create logger");

        logger
            .info("Position changed", Color::Green)
            .expect("Failed to log message");

        assert_eq!(logger.path(), log_dir.join("sim_demo_flight.log"));
        let contents = fs::read_to_string(logger.path()).expect("Failed to read log file");
        assert!(contents.contains("[INFO]"), "INFO level missing in log");
        assert!(contents.contains("Position changed"), "Logged message missing");

        fs::remove_dir_all(&log_dir).expect("Failed to remove test directory");
    }

    #[test]
    fn test_entries_below_min_level_are_dropped() {
        let log_dir = scratch_dir("levels");
        let logger = Logger::new(&log_dir, "levels")
            .expect("Failed to create logger")
            .with_min_level(Level::Warn);

        logger.debug("tick detail").unwrap();
        logger.info("tick", Color::Cyan).unwrap();
        logger.warn("slow tick").unwrap();
        logger.error("lock poisoned").unwrap();

        let contents = fs::read_to_string(logger.path()).unwrap();
        assert!(!contents.contains("tick detail"));
        assert!(!contents.contains("[INFO]"));
        assert!(contents.contains("[WARN]"));
        assert!(contents.contains("[ERROR]"));

        fs::remove_dir_all(&log_dir).unwrap();
    }

    #[test]
    fn test_new_session_truncates_previous_log() {
        let log_dir = scratch_dir("truncate");
        let first = Logger::new(&log_dir, "run").unwrap();
        first.warn("old entry").unwrap();

        let second = Logger::new(&log_dir, "run").unwrap();
        let contents = fs::read_to_string(second.path()).unwrap();
        assert!(contents.is_empty());

        fs::remove_dir_all(&log_dir).unwrap();
    }

    #[test]
    fn test_invalid_path() {
        let log_dir = scratch_dir("file_not_dir");
        fs::create_dir_all(&log_dir).unwrap();
        let file = log_dir.join("plain.txt");
        fs::write(&file, "x").unwrap();

        let result = Logger::new(&file, "run");
        assert!(matches!(result, Err(LoggerError::InvalidPath(_))));

        fs::remove_dir_all(&log_dir).unwrap();
    }
}
