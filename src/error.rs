use thiserror::Error;

/// Errors from a single message delivery attempt
#[derive(Debug, Error)]
pub enum SendError {
    #[error("messaging session not ready")]
    SessionNotReady,
    #[error("transport error: {0}")]
    Transport(String),
}

/// Rejected inputs from the HTTP surface or the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("unknown day: '{0}'")]
    UnknownDay(String),
    #[error("invalid time '{0}', expected HH:MM")]
    BadTime(String),
    #[error("invalid clock time {hour}:{minute}")]
    BadClockTime { hour: u32, minute: u32 },
    #[error("invalid timezone: '{0}'")]
    BadTimezone(String),
    #[error("lead minutes {0} out of range (0-1439)")]
    LeadOutOfRange(u32),
}
