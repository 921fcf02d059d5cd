//! Unified error handling for the trip-track library.
//!
//! This module provides a consistent error type for all trip-track operations.
//! No failure here is fatal to the tracker: a feed error leaves the previous
//! snapshot in place and the next refresh tick simply retries.

use std::fmt;

/// Unified error type for trip-track operations.
#[derive(Debug, Clone)]
pub enum TrackError {
    /// HTTP/feed transport error
    HttpError {
        message: String,
        status_code: Option<u16>,
    },
    /// Feed body could not be parsed
    MalformedFeed { message: String },
    /// An operation that requires at least one fix was given none
    EmptyTrack,
    /// Generic internal error
    Internal { message: String },
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackError::HttpError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "HTTP error ({}): {}", code, message)
                } else {
                    write!(f, "HTTP error: {}", message)
                }
            }
            TrackError::MalformedFeed { message } => {
                write!(f, "Malformed feed: {}", message)
            }
            TrackError::EmptyTrack => {
                write!(f, "Track is empty: at least one fix is required")
            }
            TrackError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for TrackError {}

/// Result type alias for trip-track operations.
pub type Result<T> = std::result::Result<T, TrackError>;

/// Extension trait for converting Option to TrackError.
pub trait OptionExt<T> {
    /// Convert Option to Result with an empty-track error.
    fn ok_or_empty_track(self) -> Result<T>;

    /// Convert Option to Result with a generic internal error.
    fn ok_or_internal(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_empty_track(self) -> Result<T> {
        self.ok_or(TrackError::EmptyTrack)
    }

    fn ok_or_internal(self, message: &str) -> Result<T> {
        self.ok_or_else(|| TrackError::Internal {
            message: message.to_string(),
        })
    }
}
