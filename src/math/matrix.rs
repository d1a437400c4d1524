use rand::Rng;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::ops::{Index, IndexMut, Mul};

use crate::error::{MlpError, Position, Result, Shape};

/// Bytes per element in the binary weight format (little-endian f32).
pub const FLOAT_BYTES: usize = 4;

/// Cells at or above this value render as blank in [`Matrix::visual`].
pub const VISUAL_THRESHOLD: f32 = 0.1;

/// Dense row-major matrix of `f32`.
///
/// Always at least 1x1, and `data.len() == rows * cols`. Cloning copies
/// the backing store, so two matrices never share storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

/// Zero-filled storage for `rows * cols` elements.
fn allocate(rows: usize, cols: usize) -> Result<Vec<f32>> {
    let len = rows
        .checked_mul(cols)
        .ok_or(MlpError::AllocationFailure { rows, cols })?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| MlpError::AllocationFailure { rows, cols })?;
    data.resize(len, 0.0);
    Ok(data)
}

impl Matrix {
    /// Zero-filled `rows x cols` matrix. Both dimensions must be positive.
    pub fn zeros(rows: usize, cols: usize) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return Err(MlpError::InvalidDimensions { rows, cols });
        }
        Ok(Matrix { rows, cols, data: allocate(rows, cols)? })
    }

    /// Wraps row-major `data` as a `rows x cols` matrix.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return Err(MlpError::InvalidDimensions { rows, cols });
        }
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(MlpError::shape_mismatch(
                "from_vec",
                Shape::new(rows, cols),
                Shape::new(data.len(), 1),
            ));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Uniform samples in [-1, 1). Takes the generator so fixtures can be seeded.
    pub fn random<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Result<Matrix> {
        let mut res = Matrix::zeros(rows, cols)?;
        for x in res.data.iter_mut() {
            *x = rng.gen::<f32>() * 2.0 - 1.0;
        }
        Ok(res)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    /// Total element count, `rows * cols`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a matrix holds at least one element.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the elements.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Transposes in place: element (i, j) moves to (j, i).
    pub fn transpose(&mut self) -> &mut Matrix {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.data[i * self.cols + j]);
            }
        }
        self.data = data;
        std::mem::swap(&mut self.rows, &mut self.cols);
        self
    }

    /// Reshapes into a `(rows * cols) x 1` column. Element order is unchanged.
    pub fn vectorize(&mut self) -> &mut Matrix {
        self.rows = self.data.len();
        self.cols = 1;
        self
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn dot(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_same_shape("dot product", other)?;
        let data = self.data.iter().zip(other.data.iter())
            .map(|(a, b)| a * b)
            .collect();
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    /// Euclidean (Frobenius) norm over all elements.
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Element-wise sum, returned as a new matrix.
    pub fn try_add(&self, other: &Matrix) -> Result<Matrix> {
        let mut res = self.clone();
        res.try_add_assign(other)?;
        Ok(res)
    }

    /// Adds `other` into `self` element-wise.
    pub fn try_add_assign(&mut self, other: &Matrix) -> Result<&mut Matrix> {
        self.ensure_same_shape("addition", other)?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
        Ok(self)
    }

    /// Standard matrix product; `self.cols` must equal `other.rows`.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(MlpError::shape_mismatch("multiplication", self.shape(), other.shape()));
        }

        let mut res = Matrix::zeros(self.rows, other.cols)?;

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i * self.cols + k] * other.data[k * other.cols + j];
                }

                res.data[i * res.cols + j] = sum;
            }
        }

        Ok(res)
    }

    /// Multiplies every element by `c`.
    pub fn scale(&self, c: f32) -> Matrix {
        self.map(|x| x * c)
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f32) -> f32,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f32> {
        let i = self.cell_index(row, col)?;
        Ok(self.data[i])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut f32> {
        let i = self.cell_index(row, col)?;
        Ok(&mut self.data[i])
    }

    /// Linear (row-major) element access.
    pub fn at(&self, index: usize) -> Result<f32> {
        self.linear_index(index)?;
        Ok(self.data[index])
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut f32> {
        self.linear_index(index)?;
        Ok(&mut self.data[index])
    }

    /// Writes each row on its own line, every element followed by a space.
    pub fn write_plain<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)
    }

    /// Prints the plain dump to stdout.
    pub fn plain_print(&self) {
        print!("{}", self);
    }

    /// Adaptor rendering the matrix as coarse ASCII art, two characters per cell.
    pub fn visual(&self) -> Visual<'_> {
        Visual(self)
    }

    /// Fills the matrix from a headerless little-endian f32 stream.
    ///
    /// Reads exactly `rows * cols * 4` bytes from the start of `reader`;
    /// anything after them is ignored. A stream shorter than that fails
    /// without touching the matrix.
    pub fn read_binary<R: Read + Seek>(&mut self, reader: &mut R) -> Result<&mut Matrix> {
        let size = self.data.len() * FLOAT_BYTES;

        let available = reader
            .seek(SeekFrom::End(0))
            .map_err(|e| MlpError::StreamReadFailure(format!("cannot seek stream: {}", e)))?;
        if available < size as u64 {
            return Err(MlpError::StreamReadFailure(format!(
                "stream holds {} bytes but a {} matrix needs {}",
                available,
                self.shape(),
                size
            )));
        }
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| MlpError::StreamReadFailure(format!("cannot rewind stream: {}", e)))?;

        let mut bytes = vec![0u8; size];
        reader
            .read_exact(&mut bytes)
            .map_err(|e| MlpError::StreamReadFailure(format!("short read: {}", e)))?;

        for (x, chunk) in self.data.iter_mut().zip(bytes.chunks_exact(FLOAT_BYTES)) {
            *x = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(self)
    }

    fn ensure_same_shape(&self, op: &str, other: &Matrix) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MlpError::shape_mismatch(op, self.shape(), other.shape()));
        }
        Ok(())
    }

    fn cell_index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(MlpError::IndexOutOfRange {
                position: Position::Cell(row, col),
                shape: self.shape(),
            });
        }
        Ok(row * self.cols + col)
    }

    fn linear_index(&self, index: usize) -> Result<()> {
        if index >= self.data.len() {
            return Err(MlpError::IndexOutOfRange {
                position: Position::Linear(index),
                shape: self.shape(),
            });
        }
        Ok(())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 1, cols: 1, data: vec![0.0] }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols) {
            for x in row {
                write!(f, "{} ", x)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// See [`Matrix::visual`].
pub struct Visual<'a>(&'a Matrix);

impl fmt::Display for Visual<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.data.chunks(self.0.cols) {
            for &x in row {
                f.write_str(if x >= VISUAL_THRESHOLD { "  " } else { "**" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Mul<f32> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f32) -> Matrix {
        self.scale(rhs)
    }
}

impl Mul<&Matrix> for f32 {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        rhs.scale(self)
    }
}

/// # Panics
/// On an out-of-range cell; use [`Matrix::get`] for a checked read.
impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        match self.cell_index(row, col) {
            Ok(i) => &self.data[i],
            Err(e) => panic!("{}", e),
        }
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        match self.cell_index(row, col) {
            Ok(i) => &mut self.data[i],
            Err(e) => panic!("{}", e),
        }
    }
}

impl Index<usize> for Matrix {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        if let Err(e) = self.linear_index(index) {
            panic!("{}", e);
        }
        &self.data[index]
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        if let Err(e) = self.linear_index(index) {
            panic!("{}", e);
        }
        &mut self.data[index]
    }
}
