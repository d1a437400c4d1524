use crate::{
    activation::activation::{Activation, ActivationKind},
    error::Result,
    math::matrix::Matrix,
};

/// Fully connected layer computing `activation(weights * input + bias)`.
///
/// Shapes are not checked here; a mismatch surfaces from [`Dense::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dense {
    weights: Matrix,
    bias: Matrix,
    activation: Activation,
}

impl Dense {
    pub fn new(weights: Matrix, bias: Matrix, kind: ActivationKind) -> Dense {
        Dense {
            weights,
            bias,
            activation: Activation::new(kind),
        }
    }

    /// Borrowed; `clone()` it for an owned copy.
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    /// Borrowed; `clone()` it for an owned copy.
    pub fn bias(&self) -> &Matrix {
        &self.bias
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Fails with `ShapeMismatch` if `weights.cols != input.rows` or the
    /// bias does not match the product's shape.
    pub fn apply(&self, input: &Matrix) -> Result<Matrix> {
        let mut z = self.weights.matmul(input)?;
        z.try_add_assign(&self.bias)?;
        Ok(self.activation.apply(&z))
    }
}
