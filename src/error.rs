use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Row/column count pair, used when reporting shape errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Shape {
        Shape { rows, cols }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Where an element access landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Cell(usize, usize),
    Linear(usize),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Cell(r, c) => write!(f, "({}, {})", r, c),
            Position::Linear(i) => write!(f, "[{}]", i),
        }
    }
}

#[derive(Debug, Error)]
pub enum MlpError {
    #[error("invalid matrix dimensions {rows}x{cols}: rows and columns must be positive")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("allocation failed for a {rows}x{cols} matrix")]
    AllocationFailure { rows: usize, cols: usize },

    #[error("shape mismatch in {op}: {left} vs {right}")]
    ShapeMismatch { op: String, left: Shape, right: Shape },

    #[error("index {position} out of range for a {shape} matrix")]
    IndexOutOfRange { position: Position, shape: Shape },

    #[error("invalid activation kind '{0}' (expected relu or softmax)")]
    InvalidActivationKind(String),

    #[error("stream read failure: {0}")]
    StreamReadFailure(String),

    #[error("cannot open '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid weight manifest: {0}")]
    Config(#[from] serde_json::Error),

    #[error("cannot decode image: {0}")]
    Image(#[from] image::ImageError),
}

impl MlpError {
    pub(crate) fn shape_mismatch(op: impl Into<String>, left: Shape, right: Shape) -> MlpError {
        MlpError::ShapeMismatch { op: op.into(), left, right }
    }
}

pub type Result<T> = std::result::Result<T, MlpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = MlpError::InvalidDimensions { rows: 0, cols: 3 };
        assert!(err.to_string().contains("0x3"));

        let err = MlpError::IndexOutOfRange {
            position: Position::Linear(16),
            shape: Shape::new(4, 4),
        };
        assert_eq!(err.to_string(), "index [16] out of range for a 4x4 matrix");

        let err = MlpError::shape_mismatch("addition", Shape::new(2, 2), Shape::new(3, 1));
        assert_eq!(err.to_string(), "shape mismatch in addition: 2x2 vs 3x1");
    }
}
