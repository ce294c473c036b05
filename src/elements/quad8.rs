//! Quad8 - 8-node serendipity quadrilateral
//!
//! ```text
//!  4----7----3
//!  |         |
//!  8         6
//!  |         |
//!  1----5----2
//! ```
//!
//! Corners come first (counter-clockwise), then the midside nodes of edges
//! 1-2, 2-3, 3-4 and 4-1. Integrated with the 3x3 Gauss rule.
//!
//! Corner shape functions: N = ¼(1 + ξᵢξ)(1 + ηᵢη)(ξᵢξ + ηᵢη - 1).
//! Midside on ξ = 0: N = ½(1 - ξ²)(1 + ηᵢη); on η = 0: N = ½(1 + ξᵢξ)(1 - η²).

use super::gauss::{gauss_3x3, GaussPoint};
use super::Formulation;

/// Serendipity quadrilateral formulation data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quad8;

impl Formulation for Quad8 {
    const NODE_COUNT: usize = 8;

    /// Node k takes the stress of point EXTRAPOLATION_MAP[k]. Corners use the
    /// corner points of the 3x3 grid, midside nodes the edge-centre points.
    const EXTRAPOLATION_MAP: &'static [usize] = &[0, 2, 8, 6, 1, 5, 7, 3];

    fn gauss_points() -> Vec<GaussPoint> {
        gauss_3x3().to_vec()
    }

    fn shape_functions(xi: f64, eta: f64) -> Vec<f64> {
        vec![
            0.25 * (1.0 - xi) * (1.0 - eta) * (-1.0 - xi - eta),
            0.25 * (1.0 + xi) * (1.0 - eta) * (-1.0 + xi - eta),
            0.25 * (1.0 + xi) * (1.0 + eta) * (-1.0 + xi + eta),
            0.25 * (1.0 - xi) * (1.0 + eta) * (-1.0 - xi + eta),
            0.5 * (1.0 - xi * xi) * (1.0 - eta),
            0.5 * (1.0 + xi) * (1.0 - eta * eta),
            0.5 * (1.0 - xi * xi) * (1.0 + eta),
            0.5 * (1.0 - xi) * (1.0 - eta * eta),
        ]
    }

    fn natural_derivatives(xi: f64, eta: f64) -> Vec<[f64; 2]> {
        vec![
            [
                (-(1.0 - eta) * (-1.0 - xi - eta) - (1.0 - xi) * (1.0 - eta)) / 4.0,
                (-(1.0 - xi) * (-1.0 - xi - eta) - (1.0 - xi) * (1.0 - eta)) / 4.0,
            ],
            [
                ((1.0 - eta) * (-1.0 + xi - eta) + (1.0 + xi) * (1.0 - eta)) / 4.0,
                (-(1.0 + xi) * (-1.0 + xi - eta) - (1.0 + xi) * (1.0 - eta)) / 4.0,
            ],
            [
                ((1.0 + eta) * (-1.0 + xi + eta) + (1.0 + xi) * (1.0 + eta)) / 4.0,
                ((1.0 + xi) * (-1.0 + xi + eta) + (1.0 + xi) * (1.0 + eta)) / 4.0,
            ],
            [
                (-(1.0 + eta) * (-1.0 - xi + eta) - (1.0 - xi) * (1.0 + eta)) / 4.0,
                ((1.0 - xi) * (-1.0 - xi + eta) + (1.0 - xi) * (1.0 + eta)) / 4.0,
            ],
            [(-2.0 * xi * (1.0 - eta)) / 2.0, (-(1.0 - xi * xi)) / 2.0],
            [(1.0 - eta * eta) / 2.0, (-2.0 * eta * (1.0 + xi)) / 2.0],
            [(-2.0 * xi * (1.0 + eta)) / 2.0, (1.0 - xi * xi) / 2.0],
            [(-(1.0 - eta * eta)) / 2.0, (-2.0 * eta * (1.0 - xi)) / 2.0],
        ]
    }

    fn extrapolation_coefficient() -> f64 {
        (5.0_f64 / 3.0).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NODE_COORDS: [(f64, f64); 8] = [
        (-1.0, -1.0),
        (1.0, -1.0),
        (1.0, 1.0),
        (-1.0, 1.0),
        (0.0, -1.0),
        (1.0, 0.0),
        (0.0, 1.0),
        (-1.0, 0.0),
    ];

    #[test]
    fn test_kronecker_delta_at_nodes() {
        for (i, &(xi, eta)) in NODE_COORDS.iter().enumerate() {
            let n = Quad8::shape_functions(xi, eta);
            for (j, value) in n.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*value, expected, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_derivatives_match_finite_difference() {
        let (xi, eta, h) = (-0.37, 0.58, 1e-6);
        let d = Quad8::natural_derivatives(xi, eta);
        let np = Quad8::shape_functions(xi + h, eta);
        let nm = Quad8::shape_functions(xi - h, eta);
        let ep = Quad8::shape_functions(xi, eta + h);
        let em = Quad8::shape_functions(xi, eta - h);
        for i in 0..8 {
            assert_relative_eq!(d[i][0], (np[i] - nm[i]) / (2.0 * h), epsilon = 1e-8);
            assert_relative_eq!(d[i][1], (ep[i] - em[i]) / (2.0 * h), epsilon = 1e-8);
        }
    }

    #[test]
    fn test_extrapolation_map_follows_node_positions() {
        let points = Quad8::gauss_points();
        for (k, &(nx, ny)) in NODE_COORDS.iter().enumerate() {
            let p = points[Quad8::EXTRAPOLATION_MAP[k]];
            assert_eq!(p.xi.abs() > 0.0, nx != 0.0);
            assert_eq!(p.eta.abs() > 0.0, ny != 0.0);
            if nx != 0.0 {
                assert_eq!(p.xi.signum(), nx);
            }
            if ny != 0.0 {
                assert_eq!(p.eta.signum(), ny);
            }
        }
    }
}
