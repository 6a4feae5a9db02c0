use grid_util::point::Point;
use std::fmt;

/// Error type shared by generation, search and path reconstruction.
#[derive(Clone, Debug, PartialEq)]
pub enum MazeError {
    /// The requested grid or generator setup can not produce a maze.
    Configuration { reason: String },
    /// The search frontier emptied without ever popping the goal.
    PathNotFound { start: Point, goal: Point },
    /// Reconstruction was asked for a goal the search tree never reached.
    Unreachable { goal: Point },
    /// The predecessor chain of the goal does not lead back to the start.
    CorruptPath { goal: Point },
}

impl MazeError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => write!(f, "invalid maze configuration: {reason}"),
            Self::PathNotFound { start, goal } => {
                write!(f, "no path from {start} to {goal}")
            }
            Self::Unreachable { goal } => write!(f, "{goal} was never reached by the search"),
            Self::CorruptPath { goal } => {
                write!(f, "predecessor chain of {goal} does not reach the start")
            }
        }
    }
}

impl std::error::Error for MazeError {}
