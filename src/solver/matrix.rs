//! Dense complex matrix assembly and solving.

use num_complex::Complex64;

use crate::error::{MeshworkError, Result};

/// Mesh equation system Zx = v.
#[derive(Debug, Clone)]
pub struct MeshMatrix {
    /// System matrix Z (row-major)
    pub a: Vec<Complex64>,
    /// Right-hand side v
    pub z: Vec<Complex64>,
    /// Solution vector x
    pub x: Vec<Complex64>,
    /// Matrix dimension
    pub size: usize,
    /// LU decomposition of Z
    pub lu: Vec<Complex64>,
    /// Pivot indices for LU decomposition
    pub pivots: Vec<usize>,
}

impl MeshMatrix {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Self {
        let zero = Complex64::new(0.0, 0.0);
        Self {
            a: vec![zero; size * size],
            z: vec![zero; size],
            x: vec![zero; size],
            size,
            lu: vec![zero; size * size],
            pivots: vec![0; size],
        }
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.a[row * self.size + col]
    }

    /// Set matrix element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: Complex64) {
        self.a[row * self.size + col] = value;
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: Complex64) {
        self.a[row * self.size + col] += value;
    }

    /// Add to the right-hand side.
    pub fn add_source(&mut self, row: usize, value: Complex64) {
        self.z[row] += value;
    }

    /// One matrix row as a slice.
    pub fn row(&self, row: usize) -> &[Complex64] {
        &self.a[row * self.size..(row + 1) * self.size]
    }

    /// Stamp the impedance of a branch shared by loops i and j.
    ///   Z[i,j] -= Zs
    ///   Z[j,i] -= Zs
    pub fn stamp_mutual(&mut self, i: usize, j: usize, impedance: Complex64) {
        self.add(i, j, -impedance);
        self.add(j, i, -impedance);
    }

    /// Stamp an ideal current source whose terminal voltage is unknown `aux`.
    ///
    /// The source sits in loop `a` and, if shared, in loop `b`. Its
    /// terminal voltage drives loop `a` and opposes loop `b`:
    ///   KVL a: ... - v_aux = V_a
    ///   KVL b: ... + v_aux = V_b
    /// and its fixed current constrains the loop currents:
    ///   x_a - x_b = I   (or x_a = I for a single loop)
    pub fn stamp_current_source(&mut self, aux: usize, a: usize, b: Option<usize>, current: Complex64) {
        let one = Complex64::new(1.0, 0.0);
        self.add(aux, a, one);
        self.add(a, aux, -one);
        if let Some(b) = b {
            self.add(aux, b, -one);
            self.add(b, aux, one);
        }
        self.z[aux] = current;
    }

    /// Perform LU decomposition with partial pivoting.
    ///
    /// A pivot smaller than `tolerance` times the largest entry of Z marks
    /// the system as singular.
    pub fn factor(&mut self, tolerance: f64) -> Result<()> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);

        for i in 0..n {
            self.pivots[i] = i;
        }

        let scale = self.a.iter().map(|v| v.norm()).fold(0.0, f64::max);
        let threshold = tolerance * scale;
        if n > 0 && scale == 0.0 {
            return Err(MeshworkError::SingularSystem);
        }

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].norm();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].norm();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if !(max_val > threshold) {
                return Err(MeshworkError::SingularSystem);
            }

            // Swap rows if needed
            if max_row != k {
                self.pivots.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    let upper = self.lu[k * n + j];
                    self.lu[i * n + j] -= factor * upper;
                }
            }
        }

        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) -> Result<()> {
        let n = self.size;

        // Apply pivot permutation to z
        for i in 0..n {
            self.x[i] = self.z[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                let l = self.lu[i * n + j];
                let y = self.x[j];
                self.x[i] -= l * y;
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let u = self.lu[i * n + j];
                let y = self.x[j];
                self.x[i] -= u * y;
            }
            let diag = self.lu[i * n + i];
            if diag.norm() == 0.0 {
                return Err(MeshworkError::SingularSystem);
            }
            self.x[i] /= diag;
        }

        if self.x.iter().any(|v| !v.re.is_finite() || !v.im.is_finite()) {
            return Err(MeshworkError::SingularSystem);
        }

        Ok(())
    }

    /// Residual Zx - v of the current solution.
    pub fn residual(&self) -> Vec<Complex64> {
        (0..self.size)
            .map(|i| {
                let lhs: Complex64 = self.row(i).iter().zip(&self.x).map(|(a, x)| a * x).sum();
                lhs - self.z[i]
            })
            .collect()
    }
}
