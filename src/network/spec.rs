use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationKind;
use crate::error::Shape;

pub const IMAGE_ROWS: usize = 28;
pub const IMAGE_COLS: usize = 28;
pub const INPUT_SIZE: usize = IMAGE_ROWS * IMAGE_COLS;

/// Number of output classes (digits 0-9).
pub const CLASSES: usize = 10;

/// Number of dense layers in the network.
pub const MLP_SIZE: usize = 4;

/// Describes one layer of the fixed topology.
///
/// Fields:
/// - `size`: number of neurons (rows of the weight matrix)
/// - `input_size`: length of the incoming column vector (weight columns)
/// - `activation`: activation applied after the affine transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationKind,
}

impl LayerSpec {
    pub const fn new(size: usize, input_size: usize, activation: ActivationKind) -> LayerSpec {
        LayerSpec { size, input_size, activation }
    }

    pub fn weights_shape(&self) -> Shape {
        Shape::new(self.size, self.input_size)
    }

    pub fn bias_shape(&self) -> Shape {
        Shape::new(self.size, 1)
    }
}

/// 784 -> 128 -> 64 -> 20 -> 10.
pub const MNIST_LAYERS: [LayerSpec; MLP_SIZE] = [
    LayerSpec::new(128, INPUT_SIZE, ActivationKind::ReLU),
    LayerSpec::new(64, 128, ActivationKind::ReLU),
    LayerSpec::new(20, 64, ActivationKind::ReLU),
    LayerSpec::new(CLASSES, 20, ActivationKind::Softmax),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_chain_from_image_to_classes() {
        assert_eq!(MNIST_LAYERS[0].input_size, INPUT_SIZE);
        for pair in MNIST_LAYERS.windows(2) {
            assert_eq!(pair[0].size, pair[1].input_size);
        }
        assert_eq!(MNIST_LAYERS[MLP_SIZE - 1].size, CLASSES);
        assert_eq!(MNIST_LAYERS[1].weights_shape(), Shape::new(64, 128));
        assert_eq!(MNIST_LAYERS[2].bias_shape(), Shape::new(20, 1));
    }
}
