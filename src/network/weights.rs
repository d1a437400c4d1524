use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{MlpError, Result, Shape};
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::network::spec::{MLP_SIZE, MNIST_LAYERS};

/// Locations of the 8 raw weight/bias files, one per matrix, in layer order.
///
/// Manifest JSON:
/// ```json
/// { "weights": ["w1", "w2", "w3", "w4"], "biases": ["b1", "b2", "b3", "b4"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightFiles {
    pub weights: [PathBuf; MLP_SIZE],
    pub biases: [PathBuf; MLP_SIZE],
}

impl WeightFiles {
    /// Takes the files in command-line order: w1..w4 then b1..b4.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P; 2 * MLP_SIZE]) -> WeightFiles {
        WeightFiles {
            weights: std::array::from_fn(|i| paths[i].as_ref().to_path_buf()),
            biases: std::array::from_fn(|i| paths[MLP_SIZE + i].as_ref().to_path_buf()),
        }
    }

    /// Deserializes a manifest previously written by `save_json`.
    pub fn load_json(path: &Path) -> Result<WeightFiles> {
        let file = File::open(path).map_err(|source| MlpError::Io { path: path.to_path_buf(), source })?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serializes the manifest to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| MlpError::Io { path: path.to_path_buf(), source })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Reads every matrix at its declared shape and builds the network.
    pub fn load(&self) -> Result<Network> {
        let mut weights = Vec::with_capacity(MLP_SIZE);
        let mut biases = Vec::with_capacity(MLP_SIZE);

        for (i, spec) in MNIST_LAYERS.iter().enumerate() {
            let shape = spec.weights_shape();
            weights.push(read_matrix(&self.weights[i], shape.rows, shape.cols)?);
            let shape = spec.bias_shape();
            biases.push(read_matrix(&self.biases[i], shape.rows, shape.cols)?);
        }

        Network::new(into_layers(weights)?, into_layers(biases)?)
    }
}

fn into_layers(matrices: Vec<Matrix>) -> Result<[Matrix; MLP_SIZE]> {
    matrices.try_into().map_err(|rest: Vec<Matrix>| {
        MlpError::shape_mismatch("layer count", Shape::new(rest.len(), 1), Shape::new(MLP_SIZE, 1))
    })
}

/// Opens `path` and fills a `rows x cols` matrix from it.
pub fn read_matrix(path: &Path, rows: usize, cols: usize) -> Result<Matrix> {
    let result = File::open(path)
        .map_err(|source| MlpError::Io { path: path.to_path_buf(), source })
        .and_then(|file| {
            let mut m = Matrix::zeros(rows, cols)?;
            m.read_binary(&mut BufReader::new(file))?;
            Ok(m)
        });

    match &result {
        Ok(_) => debug!("loaded {}x{} matrix from {}", rows, cols, path.display()),
        Err(e) => error!("failed to load {}: {}", path.display(), e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mlp-digits-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_floats(path: &Path, count: usize, value: f32) {
        let bytes: Vec<u8> = std::iter::repeat(value.to_le_bytes()).take(count).flatten().collect();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn from_paths_splits_weights_and_biases() {
        let files = WeightFiles::from_paths(&["w1", "w2", "w3", "w4", "b1", "b2", "b3", "b4"]);
        assert_eq!(files.weights[3], PathBuf::from("w4"));
        assert_eq!(files.biases[0], PathBuf::from("b1"));
    }

    #[test]
    fn manifest_round_trips_through_json() {
        let dir = scratch_dir("manifest");
        let files = WeightFiles::from_paths(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let path = dir.join("net.json");
        files.save_json(&path).unwrap();
        assert_eq!(WeightFiles::load_json(&path).unwrap(), files);

        fs::write(&path, "{\"weights\": []}").unwrap();
        assert!(matches!(WeightFiles::load_json(&path), Err(MlpError::Config(_))));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn loads_network_from_files() {
        let dir = scratch_dir("load");
        let mut paths = Vec::new();
        for (i, spec) in MNIST_LAYERS.iter().enumerate() {
            let p = dir.join(format!("w{}", i + 1));
            write_floats(&p, spec.size * spec.input_size, 0.0);
            paths.push(p);
        }
        for (i, spec) in MNIST_LAYERS.iter().enumerate() {
            let p = dir.join(format!("b{}", i + 1));
            write_floats(&p, spec.size, 0.0);
            paths.push(p);
        }
        let paths: [PathBuf; 2 * MLP_SIZE] = paths.try_into().unwrap();
        let files = WeightFiles::from_paths(&paths);

        let net = files.load().unwrap();
        let digit = net.classify(&Matrix::zeros(28, 28).unwrap()).unwrap();
        assert_eq!(digit.value, 0);

        // A truncated bias file is rejected.
        write_floats(&paths[MLP_SIZE + 1], 63, 0.0);
        assert!(matches!(files.load(), Err(MlpError::StreamReadFailure(_))));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_matrix(Path::new("/nonexistent/w1.bin"), 2, 2).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/w1.bin"));
    }
}
