//! plane-fem - 2D linear elastic finite element analysis
//!
//! Solves plane problems meshed with isoparametric quadrilaterals:
//! - Quad4 bilinear elements (2x2 Gauss integration)
//! - Quad8 serendipity elements (3x3 Gauss integration)
//! - Prescribed displacements by direct elimination, dense LU solve
//! - Stress recovery with extrapolation to nodes and nodal averaging
//! - Principal and von Mises stress
//!
//! ## Example
//! ```rust
//! use plane_fem::prelude::*;
//!
//! let mut mesh = Mesh::new();
//! mesh.add_material(Material::steel(0.01));
//!
//! mesh.add_node(Node::new(1, 0.0, 0.0).fixed()).unwrap();
//! mesh.add_node(Node::new(2, 1.0, 0.0).with_force(1000.0, 0.0)).unwrap();
//! mesh.add_node(Node::new(3, 1.0, 1.0).with_force(1000.0, 0.0)).unwrap();
//! mesh.add_node(Node::new(4, 0.0, 1.0).with_constraint(true, false)).unwrap();
//!
//! mesh.add_element(ElementDef::quad4(1, [1, 2, 3, 4], 1)).unwrap();
//!
//! let result = mesh.analyze(&AnalysisOptions::default()).unwrap();
//!
//! let displacement = result.node_displacement(3).unwrap();
//! assert!(displacement.dx > 0.0);
//! ```

pub mod analysis;
pub mod assembly;
pub mod boundary;
pub mod elements;
pub mod error;
pub mod io;
pub mod math;
pub mod model;
pub mod postprocess;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisObserver, AnalysisOptions, LogObserver};
    pub use crate::boundary::BoundaryConditions;
    pub use crate::elements::{Element, ElementKind, ElementStage, Material, Node};
    pub use crate::error::{FEMError, FEMResult};
    pub use crate::model::{ElementDef, Mesh};
    pub use crate::results::{
        AnalysisReport, AnalysisResult, AnalysisSummary, NodalStress, NodeDisplacement, Reactions,
        ResultNode,
    };
}
