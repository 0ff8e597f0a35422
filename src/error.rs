//! Error types for the association and tracking pass
//!
//! Every failure is fatal to the batch: there is no partial recovery once a
//! point fails validation or frame ordering is broken.

use std::fmt;

use crate::types::Channel;

/// Errors that can occur while joining, annotating or tracking dipoles
#[derive(Debug)]
pub enum DipoleError {
    /// A point record failed validation
    InvalidPoint {
        /// Position of the record in its input collection
        index: usize,
        /// Channel the record was supplied on
        channel: Channel,
        /// Description of the offending field
        reason: String,
    },

    /// Configuration error
    Configuration {
        /// Description of the configuration issue
        description: String,
    },

    /// Frames were supplied to the tracker out of ascending order
    FrameOrder {
        /// Last frame the tracker processed
        previous: usize,
        /// Frame that was offered next
        current: usize,
    },

    /// A detection handed to the tracker has a non-finite coordinate
    InvalidDetection {
        /// Frame the detection was offered in
        frame: usize,
        /// Position of the detection in the frame's slice
        index: usize,
    },

    /// Assignment solver failure
    Assignment(AssignmentError),

    /// JSON (de)serialization of a config or record set failed
    Json(serde_json::Error),
}

impl fmt::Display for DipoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DipoleError::InvalidPoint {
                index,
                channel,
                reason,
            } => {
                write!(f, "Invalid point #{} on {}: {}", index, channel, reason)
            }
            DipoleError::Configuration { description } => {
                write!(f, "Configuration error: {}", description)
            }
            DipoleError::FrameOrder { previous, current } => {
                write!(
                    f,
                    "Frame order violated: frame {} offered after frame {}",
                    current, previous
                )
            }
            DipoleError::InvalidDetection { frame, index } => {
                write!(f, "Non-finite detection #{} in frame {}", index, frame)
            }
            DipoleError::Assignment(e) => write!(f, "Assignment failed: {}", e),
            DipoleError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for DipoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DipoleError::Assignment(e) => Some(e),
            DipoleError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AssignmentError> for DipoleError {
    fn from(e: AssignmentError) -> Self {
        DipoleError::Assignment(e)
    }
}

impl From<serde_json::Error> for DipoleError {
    fn from(e: serde_json::Error) -> Self {
        DipoleError::Json(e)
    }
}

/// Errors raised by the assignment solver
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentError {
    /// Cost matrix contains NaN or infinite entries
    NonFiniteCost {
        /// Row of the offending entry
        row: usize,
        /// Column of the offending entry
        col: usize,
    },
}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentError::NonFiniteCost { row, col } => {
                write!(f, "Non-finite cost at ({}, {})", row, col)
            }
        }
    }
}

impl std::error::Error for AssignmentError {}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, DipoleError>;
