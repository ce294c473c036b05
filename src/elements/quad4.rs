//! Quad4 - 4-node bilinear isoparametric quadrilateral
//!
//! ```text
//!  4---------3
//!  |         |
//!  |         |
//!  1---------2
//! ```
//!
//! Integrated with the 2x2 Gauss rule. Integration point p sits closest to
//! the corner listed in [`Quad4::EXTRAPOLATION_MAP`], which is how nodal stress
//! is extrapolated with coefficient √3.

use super::gauss::{gauss_2x2, GaussPoint};
use super::Formulation;

/// Bilinear quadrilateral formulation data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quad4;

impl Formulation for Quad4 {
    const NODE_COUNT: usize = 4;

    /// Corner k takes the stress of point EXTRAPOLATION_MAP[k]
    const EXTRAPOLATION_MAP: &'static [usize] = &[0, 1, 3, 2];

    fn gauss_points() -> Vec<GaussPoint> {
        gauss_2x2().to_vec()
    }

    fn shape_functions(xi: f64, eta: f64) -> Vec<f64> {
        vec![
            0.25 * (1.0 - xi) * (1.0 - eta),
            0.25 * (1.0 + xi) * (1.0 - eta),
            0.25 * (1.0 + xi) * (1.0 + eta),
            0.25 * (1.0 - xi) * (1.0 + eta),
        ]
    }

    fn natural_derivatives(xi: f64, eta: f64) -> Vec<[f64; 2]> {
        vec![
            [-(1.0 - eta) / 4.0, -(1.0 - xi) / 4.0],
            [(1.0 - eta) / 4.0, -(1.0 + xi) / 4.0],
            [(1.0 + eta) / 4.0, (1.0 + xi) / 4.0],
            [-(1.0 + eta) / 4.0, (1.0 - xi) / 4.0],
        ]
    }

    fn extrapolation_coefficient() -> f64 {
        3.0_f64.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_partition_of_unity() {
        for (xi, eta) in [(0.0, 0.0), (0.3, -0.7), (-1.0, 1.0)] {
            let sum: f64 = Quad4::shape_functions(xi, eta).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
            let dsum = Quad4::natural_derivatives(xi, eta)
                .iter()
                .fold([0.0, 0.0], |acc, d| [acc[0] + d[0], acc[1] + d[1]]);
            assert_relative_eq!(dsum[0], 0.0, epsilon = 1e-14);
            assert_relative_eq!(dsum[1], 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_derivatives_match_finite_difference() {
        let (xi, eta, h) = (0.21, -0.43, 1e-6);
        let d = Quad4::natural_derivatives(xi, eta);
        let np = Quad4::shape_functions(xi + h, eta);
        let nm = Quad4::shape_functions(xi - h, eta);
        let ep = Quad4::shape_functions(xi, eta + h);
        let em = Quad4::shape_functions(xi, eta - h);
        for i in 0..4 {
            assert_relative_eq!(d[i][0], (np[i] - nm[i]) / (2.0 * h), epsilon = 1e-8);
            assert_relative_eq!(d[i][1], (ep[i] - em[i]) / (2.0 * h), epsilon = 1e-8);
        }
    }

    #[test]
    fn test_extrapolation_map_points_at_nearest_corner() {
        let points = Quad4::gauss_points();
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        for (k, &(cx, cy)) in corners.iter().enumerate() {
            let p = points[Quad4::EXTRAPOLATION_MAP[k]];
            assert_eq!(p.xi.signum(), cx);
            assert_eq!(p.eta.signum(), cy);
        }
    }
}
