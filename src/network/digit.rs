use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification result: the predicted digit and its softmax probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Digit {
    pub value: usize,
    pub probability: f32,
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mlp result: {} at probability: {}", self.value, self.probability)
    }
}
