//! Ridge-regularised least squares on dense feature rows.
//!
//! Model:
//! - Accumulate the normal equations `(X'X + lambda*I') b = X'y`.
//! - Column 0 is the intercept and is not penalised.
//! - Solve with Gaussian elimination and partial pivoting.

use crate::error::ModelError;

const PIVOT_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct RidgeRegression {
    coefficients: Vec<f64>,
}

impl RidgeRegression {
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], lambda: f64) -> Result<Self, ModelError> {
        let Some(first) = rows.first() else {
            return Err(ModelError::InsufficientData {
                required: 1,
                provided: 0,
            });
        };
        let dims = first.len();
        if rows.len() != targets.len() {
            return Err(ModelError::InvalidConfig(format!(
                "{} feature rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }
        if !(lambda.is_finite() && lambda >= 0.0) {
            return Err(ModelError::InvalidConfig(format!(
                "ridge lambda must be finite and >= 0 (got {lambda})"
            )));
        }

        let mut xtx = vec![vec![0.0; dims]; dims];
        let mut xty = vec![0.0; dims];
        for (row, &y) in rows.iter().zip(targets) {
            if row.len() != dims {
                return Err(ModelError::InvalidConfig(
                    "feature rows have inconsistent widths".to_string(),
                ));
            }
            for i in 0..dims {
                xty[i] += row[i] * y;
                for j in i..dims {
                    xtx[i][j] += row[i] * row[j];
                }
            }
        }
        // Mirror the upper triangle.
        for i in 0..dims {
            for j in 0..i {
                xtx[i][j] = xtx[j][i];
            }
        }
        for (i, row) in xtx.iter_mut().enumerate().skip(1) {
            row[i] += lambda;
        }

        let coefficients = solve(xtx, xty)?;
        Ok(Self { coefficients })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        self.coefficients.iter().zip(row).map(|(b, x)| b * x).sum()
    }
}

/// Solve `a x = b` in place. `a` must be square.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, ModelError> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < PIVOT_EPSILON {
            return Err(ModelError::Singular);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    if x.iter().all(|v| v.is_finite()) {
        Ok(x)
    } else {
        Err(ModelError::Singular)
    }
}
