//! Loading of the 28x28 input image.
//!
//! Raw files hold 784 little-endian f32 pixels, the same layout as the
//! weight files. PNG/JPEG/BMP/GIF files are decoded, resized to 28x28,
//! converted to grayscale and normalized to [0, 1].

use image::imageops::FilterType;
use std::path::Path;

use crate::error::{MlpError, Result};
use crate::math::matrix::Matrix;
use crate::network::spec::{IMAGE_COLS, IMAGE_ROWS};
use crate::network::weights::read_matrix;

const DECODED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

pub fn load_image(path: &Path) -> Result<Matrix> {
    let decoded = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DECODED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);

    if decoded {
        let bytes = std::fs::read(path)
            .map_err(|source| MlpError::Io { path: path.to_path_buf(), source })?;
        image_bytes_to_matrix(&bytes)
    } else {
        read_matrix(path, IMAGE_ROWS, IMAGE_COLS)
    }
}

/// Decodes image bytes into a normalized 28x28 grayscale matrix.
pub fn image_bytes_to_matrix(bytes: &[u8]) -> Result<Matrix> {
    let img = image::load_from_memory(bytes)?;
    let resized = img.resize_exact(IMAGE_COLS as u32, IMAGE_ROWS as u32, FilterType::Lanczos3);
    let gray = resized.to_luma8();
    let pixels = gray.pixels().map(|p| p.0[0] as f32 / 255.0).collect();
    Matrix::from_vec(IMAGE_ROWS, IMAGE_COLS, pixels)
}
