use log::{debug, trace};

use crate::{
    error::{MlpError, Result, Shape},
    layers::dense::Dense,
    math::matrix::Matrix,
    network::digit::Digit,
    network::spec::{CLASSES, INPUT_SIZE, MLP_SIZE, MNIST_LAYERS},
};

/// The fixed 4-layer digit classifier described by [`MNIST_LAYERS`].
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Dense>,
}

impl Network {
    /// Builds the network from per-layer weights and biases, in layer order.
    ///
    /// Every matrix is checked against [`MNIST_LAYERS`] up front, so a
    /// wrongly shaped weight file is reported here rather than on the first
    /// forward pass.
    pub fn new(weights: [Matrix; MLP_SIZE], biases: [Matrix; MLP_SIZE]) -> Result<Network> {
        let mut layers = Vec::with_capacity(MLP_SIZE);

        for (i, ((w, b), spec)) in weights.into_iter().zip(biases).zip(MNIST_LAYERS.iter()).enumerate() {
            if w.shape() != spec.weights_shape() {
                return Err(MlpError::shape_mismatch(
                    format!("layer {} weights", i + 1),
                    w.shape(),
                    spec.weights_shape(),
                ));
            }
            if b.shape() != spec.bias_shape() {
                return Err(MlpError::shape_mismatch(
                    format!("layer {} bias", i + 1),
                    b.shape(),
                    spec.bias_shape(),
                ));
            }
            layers.push(Dense::new(w, b, spec.activation));
        }

        Ok(Network { layers })
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Runs the forward pass and returns the 10x1 probability vector.
    ///
    /// `input` may be the 28x28 image or its 784x1 column; it is copied,
    /// never modified.
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        if input.len() != INPUT_SIZE {
            return Err(MlpError::shape_mismatch(
                "network input",
                input.shape(),
                Shape::new(INPUT_SIZE, 1),
            ));
        }

        let mut current = input.clone();
        current.vectorize();
        for (i, layer) in self.layers.iter().enumerate() {
            current = layer.apply(&current)?;
            trace!("layer {} ({}) -> {}", i + 1, layer.activation().kind(), current.shape());
        }
        Ok(current)
    }

    /// Forward pass followed by argmax. Ties go to the lowest index.
    pub fn classify(&self, input: &Matrix) -> Result<Digit> {
        let output = self.forward(input)?;
        let probabilities = &output.as_slice()[..CLASSES];

        let mut best = Digit { value: 0, probability: probabilities[0] };
        for (value, &probability) in probabilities.iter().enumerate().skip(1) {
            if probability > best.probability {
                best = Digit { value, probability };
            }
        }

        debug!("classified as {} (p = {})", best.value, best.probability);
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationKind;

    fn zero_params() -> ([Matrix; MLP_SIZE], [Matrix; MLP_SIZE]) {
        let w = MNIST_LAYERS.map(|s| Matrix::zeros(s.size, s.input_size).unwrap());
        let b = MNIST_LAYERS.map(|s| Matrix::zeros(s.size, 1).unwrap());
        (w, b)
    }

    #[test]
    fn layers_follow_fixed_activations() {
        let (w, b) = zero_params();
        let net = Network::new(w, b).unwrap();
        let kinds: Vec<_> = net.layers().iter().map(|l| l.activation().kind()).collect();
        assert_eq!(
            kinds,
            vec![ActivationKind::ReLU, ActivationKind::ReLU, ActivationKind::ReLU, ActivationKind::Softmax]
        );
    }

    #[test]
    fn wrong_weight_shape_fails_at_construction() {
        let (mut w, b) = zero_params();
        w[2] = Matrix::zeros(64, 20).unwrap();
        let err = Network::new(w, b).unwrap_err();
        match err {
            MlpError::ShapeMismatch { op, left, right } => {
                assert_eq!(op, "layer 3 weights");
                assert_eq!(left, Shape::new(64, 20));
                assert_eq!(right, Shape::new(20, 64));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn wrong_bias_shape_fails_at_construction() {
        let (w, mut b) = zero_params();
        b[3] = Matrix::zeros(1, 10).unwrap();
        assert!(matches!(Network::new(w, b), Err(MlpError::ShapeMismatch { .. })));
    }

    #[test]
    fn input_of_wrong_size_is_rejected() {
        let (w, b) = zero_params();
        let net = Network::new(w, b).unwrap();
        assert!(matches!(
            net.classify(&Matrix::zeros(27, 28).unwrap()),
            Err(MlpError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn bias_on_last_layer_picks_class() {
        let (w, mut b) = zero_params();
        b[3][7] = 5.0;
        let net = Network::new(w, b).unwrap();
        let digit = net.classify(&Matrix::zeros(28, 28).unwrap()).unwrap();
        assert_eq!(digit.value, 7);
        assert!(digit.probability > 0.9);
    }

    #[test]
    fn ties_resolve_to_first_maximum() {
        let (w, mut b) = zero_params();
        b[3][4] = 2.0;
        b[3][8] = 2.0;
        let net = Network::new(w, b).unwrap();
        let digit = net.classify(&Matrix::zeros(784, 1).unwrap()).unwrap();
        assert_eq!(digit.value, 4);
    }
}
