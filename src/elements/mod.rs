//! Element formulations and model entities

mod element;
pub mod gauss;
mod material;
mod node;
mod quad4;
mod quad8;

use serde::{Deserialize, Serialize};

pub use element::{Element, ElementStage};
pub use gauss::GaussPoint;
pub use material::Material;
pub use node::{Node, NodeSnapshot};
pub use quad4::Quad4;
pub use quad8::Quad8;

/// Per-kind constant data of an isoparametric quadrilateral.
pub trait Formulation {
    /// Nodes per element
    const NODE_COUNT: usize;

    /// Integration point used to extrapolate the stress of each node
    const EXTRAPOLATION_MAP: &'static [usize];

    /// Integration points in their fixed order
    fn gauss_points() -> Vec<GaussPoint>;

    /// Shape function values at (ξ, η)
    fn shape_functions(xi: f64, eta: f64) -> Vec<f64>;

    /// [dNi/dξ, dNi/dη] for every node at (ξ, η)
    fn natural_derivatives(xi: f64, eta: f64) -> Vec<[f64; 2]>;

    /// Linear extrapolation factor from integration points to nodes
    fn extrapolation_coefficient() -> f64;
}

/// The element kinds the solver supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// 4-node bilinear quadrilateral
    Quad4,
    /// 8-node serendipity quadrilateral
    Quad8,
}

impl ElementKind {
    /// Pick the kind from the number of node references
    pub fn from_node_count(count: usize) -> Option<Self> {
        match count {
            4 => Some(Self::Quad4),
            8 => Some(Self::Quad8),
            _ => None,
        }
    }

    pub fn node_count(self) -> usize {
        match self {
            Self::Quad4 => Quad4::NODE_COUNT,
            Self::Quad8 => Quad8::NODE_COUNT,
        }
    }

    /// Element degrees of freedom (two per node)
    pub fn dof_count(self) -> usize {
        2 * self.node_count()
    }

    pub fn gauss_points(self) -> Vec<GaussPoint> {
        match self {
            Self::Quad4 => Quad4::gauss_points(),
            Self::Quad8 => Quad8::gauss_points(),
        }
    }

    pub fn shape_functions(self, xi: f64, eta: f64) -> Vec<f64> {
        match self {
            Self::Quad4 => Quad4::shape_functions(xi, eta),
            Self::Quad8 => Quad8::shape_functions(xi, eta),
        }
    }

    pub fn natural_derivatives(self, xi: f64, eta: f64) -> Vec<[f64; 2]> {
        match self {
            Self::Quad4 => Quad4::natural_derivatives(xi, eta),
            Self::Quad8 => Quad8::natural_derivatives(xi, eta),
        }
    }

    pub fn extrapolation_map(self) -> &'static [usize] {
        match self {
            Self::Quad4 => Quad4::EXTRAPOLATION_MAP,
            Self::Quad8 => Quad8::EXTRAPOLATION_MAP,
        }
    }

    pub fn extrapolation_coefficient(self) -> f64 {
        match self {
            Self::Quad4 => Quad4::extrapolation_coefficient(),
            Self::Quad8 => Quad8::extrapolation_coefficient(),
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quad4 => write!(f, "Quad4"),
            Self::Quad8 => write!(f, "Quad8"),
        }
    }
}
