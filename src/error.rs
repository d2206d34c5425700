use thiserror::Error;

/// Main error type for the edit-director library
#[derive(Error, Debug)]
pub enum DirectorError {
    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pipeline run for '{source_id}' was cancelled")]
    Cancelled { source_id: String },

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Malformed input: raw signals, timelines and segments
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Invalid duration for {what}: {value}")]
    InvalidDuration { what: String, value: f64 },

    #[error("Non-finite value in {field} at index {index}")]
    NonFiniteValue { field: String, index: usize },

    #[error("Value {value} in {field} at index {index} is outside [0, 1]")]
    OutOfRange { field: String, index: usize, value: f64 },

    #[error("Timestamps in {field} are not sorted ascending (index {index})")]
    UnsortedTimestamps { field: String, index: usize },

    #[error("Length mismatch: {left} has {left_len} entries, {right} has {right_len}")]
    LengthMismatch {
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
    },

    #[error("Invalid speech interval at index {index}: [{start}, {end}]")]
    InvalidSpeechInterval { index: usize, start: f64, end: f64 },

    #[error("'{source_id}' would need {points} time points, more than the {limit} allowed")]
    TooManyPoints { source_id: String, points: f64, limit: usize },

    #[error("Invalid timeline: {reason}")]
    InvalidTimeline { reason: String },

    #[error("Invalid segment {id}: {reason}")]
    InvalidSegment { id: String, reason: String },

    #[error("Failed to load signal file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to parse signal data from {path}: {reason}")]
    ParseFailed { path: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Unknown {kind} strategy: {name}")]
    UnknownStrategy { kind: String, name: String },

    #[error("Splitting {length}s into chunks of at most {max_len}s needs more than {limit} chunks")]
    TooManyChunks { length: f64, max_len: f64, limit: usize },
}

/// Plan assembly self-check failures
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Clip durations sum to {actual}s but metadata reports {expected}s")]
    InconsistentDuration { expected: f64, actual: f64 },

    #[error("Clip {index} starts before its predecessor")]
    UnorderedClips { index: usize },
}

/// Convenience type alias for Results using DirectorError
pub type Result<T> = std::result::Result<T, DirectorError>;

impl DirectorError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried)
    ///
    /// The core is pure, so only the I/O around it can succeed on a retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Signal(SignalError::LoadFailed { .. }) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Signal(SignalError::LoadFailed { path }) => {
                format!("Could not load signal file '{}'. Please check the file exists and is readable.", path)
            }
            Self::Config(ConfigError::UnknownStrategy { kind, name }) => {
                format!("Unknown {} '{}'. Run with --help to list the built-in strategies.", kind, name)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Cancelled { source_id } => {
                format!("Processing of '{}' was cancelled; no partial plan was kept.", source_id)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        let io: DirectorError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert!(io.is_recoverable());

        let load: DirectorError = SignalError::LoadFailed { path: "a.json".to_string() }.into();
        assert!(load.is_recoverable());

        let config: DirectorError = ConfigError::InvalidValue {
            key: "edit.target_duration".to_string(),
            value: "0".to_string(),
        }
        .into();
        assert!(!config.is_recoverable());
    }

    #[test]
    fn test_user_message_for_cancellation() {
        let err = DirectorError::Cancelled { source_id: "clip-a".to_string() };
        assert!(err.user_message().contains("clip-a"));
    }
}
