//! Error types for maze generation and the terminal driver

use std::fmt;

/// Errors raised by the grid and the generator.
///
/// None of these are expected while stepping a generator that was built successfully;
/// they all indicate bad input at creation time or a caller/implementation defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Grid creation was requested with a zero width or height
    InvalidDimension {
        /// Requested width
        width: u16,
        /// Requested height
        height: u16,
    },

    /// A query or carve targeted a coordinate outside the grid
    OutOfBounds {
        /// Column of the offending coordinate, may be negative for a neighbor off the west edge
        x: i32,
        /// Row of the offending coordinate, may be negative for a neighbor off the north edge
        y: i32,
        /// Grid width
        width: u16,
        /// Grid height
        height: u16,
    },

    /// A defensive check inside the generator failed
    InternalInvariantViolation {
        /// What went wrong
        reason: &'static str,
    },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { width, height } => {
                write!(
                    f,
                    "Invalid maze dimensions {width}x{height}: width and height must be positive"
                )
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "Coordinate ({x}, {y}) is outside the {width}x{height} grid"
                )
            }
            Self::InternalInvariantViolation { reason } => {
                write!(f, "Internal invariant violated: {reason}")
            }
        }
    }
}

impl std::error::Error for MazeError {}

/// Convenience type alias for grid and generator results
pub type Result<T> = std::result::Result<T, MazeError>;

/// Errors surfaced by the terminal application and the binaries.
#[derive(Debug)]
pub enum AppError {
    /// Terminal or log file I/O failed
    Io(std::io::Error),
    /// The maze core rejected an operation
    Maze(MazeError),
    /// A user-supplied setting failed validation
    InvalidSetting {
        /// Name of the setting
        name: &'static str,
        /// Value that was rejected
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(source) => write!(f, "I/O error: {source}"),
            Self::Maze(source) => write!(f, "{source}"),
            Self::InvalidSetting {
                name,
                value,
                reason,
            } => write!(f, "Invalid setting '{name}' = '{value}': {reason}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(source) => Some(source),
            Self::Maze(source) => Some(source),
            Self::InvalidSetting { .. } => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<MazeError> for AppError {
    fn from(error: MazeError) -> Self {
        Self::Maze(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message_names_coordinate() {
        let error = MazeError::OutOfBounds {
            x: -1,
            y: 3,
            width: 4,
            height: 5,
        };
        assert_eq!(error.to_string(), "Coordinate (-1, 3) is outside the 4x5 grid");
    }

    #[test]
    fn test_app_error_wraps_maze_error() {
        let error: AppError = MazeError::InvalidDimension {
            width: 0,
            height: 2,
        }
        .into();
        assert!(matches!(error, AppError::Maze(_)));
        assert!(std::error::Error::source(&error).is_some());
    }
}
