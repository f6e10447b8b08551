//! Least-squares line for the factor scatter plot.
//!
//! Fits `count = intercept + slope * factor` by solving the two-column
//! design matrix `[1, x]` with SVD, the same way larger curve fits do.

use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// `None` with fewer than two distinct x values or an ill-conditioned system.
pub fn fit_line(points: &[(f64, u64)]) -> Option<LinearFit> {
    let (first, _) = points.first()?;
    if points.iter().all(|(x, _)| x == first) {
        return None;
    }

    let n = points.len();
    let x = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { points[i].0 });
    let y = DVector::from_iterator(n, points.iter().map(|&(_, c)| c as f64));

    let svd = x.svd(true, true);
    let beta = svd.solve(&y, 1e-10).ok()?;
    if !beta.iter().all(|v| v.is_finite()) {
        return None;
    }

    Some(LinearFit {
        intercept: beta[0],
        slope: beta[1],
    })
}
