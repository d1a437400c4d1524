pub mod digit;
pub mod network;
pub mod spec;
pub mod weights;

pub use digit::Digit;
pub use network::Network;
pub use spec::{LayerSpec, MNIST_LAYERS};
pub use weights::WeightFiles;
