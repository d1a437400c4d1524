use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MlpError;
use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationKind {
    ReLU,
    /// Normalizes over every element of the input at once, not per row or
    /// column. Only meaningful on a single vector.
    Softmax,
}

impl FromStr for ActivationKind {
    type Err = MlpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relu" => Ok(ActivationKind::ReLU),
            "softmax" => Ok(ActivationKind::Softmax),
            _ => Err(MlpError::InvalidActivationKind(s.to_owned())),
        }
    }
}

/// Numeric tags: 0 is ReLU, 1 is Softmax.
impl TryFrom<u8> for ActivationKind {
    type Error = MlpError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(ActivationKind::ReLU),
            1 => Ok(ActivationKind::Softmax),
            _ => Err(MlpError::InvalidActivationKind(tag.to_string())),
        }
    }
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationKind::ReLU => f.write_str("relu"),
            ActivationKind::Softmax => f.write_str("softmax"),
        }
    }
}

/// Stateless activation function; applying it never mutates the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    kind: ActivationKind,
}

impl Activation {
    pub fn new(kind: ActivationKind) -> Activation {
        Activation { kind }
    }

    pub fn kind(&self) -> ActivationKind {
        self.kind
    }

    /// Returns a new matrix of the same shape as `input`.
    pub fn apply(&self, input: &Matrix) -> Matrix {
        match self.kind {
            ActivationKind::ReLU => relu(input),
            ActivationKind::Softmax => softmax(input),
        }
    }
}

impl From<ActivationKind> for Activation {
    fn from(kind: ActivationKind) -> Self {
        Activation::new(kind)
    }
}

fn relu(input: &Matrix) -> Matrix {
    input.map(|x| if x < 0.0 { 0.0 } else { x })
}

/// `exp(x_i) / sum_j exp(x_j)` over the whole matrix. No max-subtraction,
/// so very large inputs overflow to NaN.
fn softmax(input: &Matrix) -> Matrix {
    let exps = input.map(f32::exp);
    let sum: f32 = exps.as_slice().iter().sum();
    exps.scale(1.0 / sum)
}
