//! Gauss-Legendre quadrature on the reference square [-1, 1]²
//!
//! Points are returned in a fixed order because stress extrapolation refers
//! to integration points by index.

use serde::{Deserialize, Serialize};

/// A quadrature point in natural coordinates with its per-axis weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussPoint {
    /// ξ coordinate
    pub xi: f64,
    /// η coordinate
    pub eta: f64,
    /// Weight along ξ
    pub wi: f64,
    /// Weight along η
    pub wj: f64,
}

impl GaussPoint {
    pub fn new(xi: f64, eta: f64, wi: f64, wj: f64) -> Self {
        Self { xi, eta, wi, wj }
    }

    /// Combined weight wi * wj
    #[inline]
    pub fn weight(&self) -> f64 {
        self.wi * self.wj
    }
}

/// 2x2 rule, ordered (-,-), (+,-), (-,+), (+,+).
pub fn gauss_2x2() -> [GaussPoint; 4] {
    let g = 1.0 / 3.0_f64.sqrt();
    [
        GaussPoint::new(-g, -g, 1.0, 1.0),
        GaussPoint::new(g, -g, 1.0, 1.0),
        GaussPoint::new(-g, g, 1.0, 1.0),
        GaussPoint::new(g, g, 1.0, 1.0),
    ]
}

/// 3x3 rule with ξ varying fastest.
pub fn gauss_3x3() -> [GaussPoint; 9] {
    let g = (3.0_f64 / 5.0).sqrt();
    let we = 5.0 / 9.0;
    let wc = 8.0 / 9.0;

    let coords = [(-g, we), (0.0, wc), (g, we)];
    let mut points = [GaussPoint::new(0.0, 0.0, 0.0, 0.0); 9];
    for (j, &(eta, wj)) in coords.iter().enumerate() {
        for (i, &(xi, wi)) in coords.iter().enumerate() {
            points[3 * j + i] = GaussPoint::new(xi, eta, wi, wj);
        }
    }
    points
}
