//! Error types for the infrastructure around the simulation.
//!
//! The simulation itself never fails: player actions that cannot run return a
//! [`crate::sim::Rejection`] and leave state untouched. Errors here cover
//! loading/saving and configuration, where something outside the game went
//! wrong.

use std::fmt;

/// Save/load failure
#[derive(Debug)]
pub enum PersistError {
    /// The backing store could not be read or written
    Io(std::io::Error),
    /// Save data is not valid JSON or does not fit the state shape
    Corrupt(serde_json::Error),
    /// Serializing the snapshot failed
    Encode(serde_json::Error),
    /// Browser storage is unavailable or refused the write
    Storage(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(err) => write!(f, "save store i/o failed: {}", err),
            PersistError::Corrupt(err) => write!(f, "save data is corrupt: {}", err),
            PersistError::Encode(err) => write!(f, "could not encode save snapshot: {}", err),
            PersistError::Storage(msg) => write!(f, "save storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(err) => Some(err),
            PersistError::Corrupt(err) | PersistError::Encode(err) => Some(err),
            PersistError::Storage(_) => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        PersistError::Io(err)
    }
}

/// Tuning file could not be used
#[derive(Debug)]
pub enum TuningError {
    /// TOML syntax or type mismatch
    Parse(toml::de::Error),
    /// A value is outside the range the simulation tolerates
    OutOfRange {
        /// Field name (for logging)
        name: &'static str,
        /// The value that was rejected
        value: f64,
        /// Human-readable description of the safe range
        safe_range: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(err) => write!(f, "tuning file is invalid: {}", err),
            TuningError::OutOfRange {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "tuning value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(err) => Some(err),
            TuningError::OutOfRange { .. } => None,
        }
    }
}
