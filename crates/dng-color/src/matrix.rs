//! Small dense matrices for the color pipeline

use dng_core::consts::SINGULAR_EPSILON;
use dng_core::{DngError, DngResult};
use num_traits::Float;

/// Row-major matrix of `rows x cols` values
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Float = f64> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Float> Matrix<T> {
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<T>) -> DngResult<Self> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return Err(DngError::InvalidDimensions {
                width: cols,
                height: if cols == 0 { rows } else { data.len() / cols },
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn from_rows<const N: usize>(rows: &[[T; N]]) -> DngResult<Self> {
        let data = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Self::from_row_major(rows.len(), N, data)
    }

    pub fn identity(n: usize) -> Self {
        let mut data = vec![T::zero(); n * n];
        for i in 0..n {
            data[i * n + i] = T::one();
        }
        Self { rows: n, cols: n, data }
    }

    /// Square matrix with `values` on the diagonal
    pub fn diagonal(values: &[T]) -> Self {
        let n = values.len();
        let mut data = vec![T::zero(); n * n];
        for (i, &v) in values.iter().enumerate() {
            data[i * n + i] = v;
        }
        Self { rows: n, cols: n, data }
    }

    /// Column vector
    pub fn column(values: &[T]) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn multiply(&self, other: &Matrix<T>) -> DngResult<Matrix<T>> {
        if self.cols != other.rows {
            return Err(DngError::DimensionMismatch {
                operation: "multiply",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut out = Matrix {
            rows: self.rows,
            cols: other.cols,
            data: vec![T::zero(); self.rows * other.cols],
        };
        for r in 0..self.rows {
            for c in 0..other.cols {
                let mut sum = T::zero();
                for k in 0..self.cols {
                    sum = sum + self.get(r, k) * other.get(k, c);
                }
                out.set(r, c, sum);
            }
        }
        Ok(out)
    }

    fn require_square(&self, operation: &'static str) -> DngResult<()> {
        if self.rows != self.cols {
            return Err(DngError::DimensionMismatch {
                operation,
                left: self.shape(),
                right: (self.cols, self.rows),
            });
        }
        Ok(())
    }

    /// The matrix without row `skip_row` and column `skip_col`
    fn minor(&self, skip_row: usize, skip_col: usize) -> Matrix<T> {
        let data = (0..self.rows)
            .filter(|&r| r != skip_row)
            .flat_map(|r| {
                (0..self.cols)
                    .filter(move |&c| c != skip_col)
                    .map(move |c| self.get(r, c))
            })
            .collect();
        Matrix {
            rows: self.rows - 1,
            cols: self.cols - 1,
            data,
        }
    }

    fn det_unchecked(&self) -> T {
        match self.rows {
            1 => self.data[0],
            2 => self.get(0, 0) * self.get(1, 1) - self.get(0, 1) * self.get(1, 0),
            n => {
                // Cofactor expansion along the first row
                let mut sum = T::zero();
                for c in 0..n {
                    let term = self.get(0, c) * self.minor(0, c).det_unchecked();
                    sum = if c % 2 == 0 { sum + term } else { sum - term };
                }
                sum
            }
        }
    }

    pub fn determinant(&self) -> DngResult<T> {
        self.require_square("determinant")?;
        Ok(self.det_unchecked())
    }

    /// Transpose of the cofactor matrix
    pub fn adjugate(&self) -> DngResult<Matrix<T>> {
        self.require_square("adjugate")?;
        let n = self.rows;
        if n == 1 {
            return Ok(Matrix::identity(1));
        }
        let mut out = Matrix::identity(n);
        for r in 0..n {
            for c in 0..n {
                let cofactor = self.minor(r, c).det_unchecked();
                let signed = if (r + c) % 2 == 0 { cofactor } else { -cofactor };
                out.set(c, r, signed);
            }
        }
        Ok(out)
    }

    pub fn inverse(&self) -> DngResult<Matrix<T>> {
        let det = self.determinant()?;
        let epsilon = T::from(SINGULAR_EPSILON).unwrap_or_else(T::epsilon);
        if !det.is_finite() || det.abs() <= epsilon {
            return Err(DngError::SingularMatrix {
                determinant: det.to_f64().unwrap_or(f64::NAN),
            });
        }
        let adjugate = self.adjugate()?;
        Ok(adjugate.scale(T::one() / det))
    }

    pub fn scale(&self, factor: T) -> Matrix<T> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| v * factor).collect(),
        }
    }

    /// `alpha * a + (1 - alpha) * b`
    pub fn blend(a: &Matrix<T>, b: &Matrix<T>, alpha: T) -> DngResult<Matrix<T>> {
        if a.shape() != b.shape() {
            return Err(DngError::DimensionMismatch {
                operation: "blend",
                left: a.shape(),
                right: b.shape(),
            });
        }
        let beta = T::one() - alpha;
        Ok(Matrix {
            rows: a.rows,
            cols: a.cols,
            data: a
                .data
                .iter()
                .zip(&b.data)
                .map(|(&x, &y)| alpha * x + beta * y)
                .collect(),
        })
    }

    /// Apply a 3x3 matrix to a 3-vector
    pub fn transform3(&self, v: [T; 3]) -> DngResult<[T; 3]> {
        if self.shape() != (3, 3) {
            return Err(DngError::DimensionMismatch {
                operation: "transform3",
                left: self.shape(),
                right: (3, 1),
            });
        }
        let row = |r: usize| self.get(r, 0) * v[0] + self.get(r, 1) * v[1] + self.get(r, 2) * v[2];
        Ok([row(0), row(1), row(2)])
    }

    /// Entries of a 3x3 matrix as `f32` rows
    pub fn to_f32_3x3(&self) -> DngResult<[[f32; 3]; 3]> {
        if self.shape() != (3, 3) {
            return Err(DngError::DimensionMismatch {
                operation: "to_f32_3x3",
                left: self.shape(),
                right: (3, 3),
            });
        }
        let mut out = [[0.0f32; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.get(r, c).to_f32().unwrap_or(f32::NAN);
            }
        }
        Ok(out)
    }
}
