//! Result types for plane analysis

use serde::{Deserialize, Serialize};

use crate::elements::Element;
use crate::error::FEMResult;
use crate::math::Vec as FEVec;
use crate::postprocess::{principal_stresses, von_mises};

/// Displacement results at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY]
    pub fn from_array(arr: [f64; 2]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// Reaction forces at a node, zero on unconstrained axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    pub fx: f64,
    pub fy: f64,
}

impl Reactions {
    pub fn from_array(arr: [f64; 2]) -> Self {
        Self {
            fx: arr[0],
            fy: arr[1],
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.fx.hypot(self.fy)
    }
}

/// Averaged stress state at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodalStress {
    /// Normal stress in X direction
    pub sx: f64,
    /// Normal stress in Y direction
    pub sy: f64,
    /// Shear stress XY
    pub txy: f64,
    /// Maximum principal stress
    pub s1: f64,
    /// Minimum principal stress
    pub s2: f64,
    /// Von Mises equivalent stress
    pub von_mises: f64,
}

impl NodalStress {
    /// Create from stress components
    pub fn from_components(sx: f64, sy: f64, txy: f64) -> Self {
        let (s1, s2) = principal_stresses(sx, sy, txy);
        Self {
            sx,
            sy,
            txy,
            s1,
            s2,
            von_mises: von_mises(s1, s2),
        }
    }
}

/// Everything reported for one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultNode {
    /// 1-based node number
    pub number: usize,
    pub displacement: NodeDisplacement,
    pub stress: NodalStress,
    pub reaction: Reactions,
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Constrained DOFs
    pub constrained_dofs: usize,
    /// Maximum displacement magnitude
    pub max_displacement: f64,
    /// Node with maximum displacement
    pub max_disp_node: usize,
    /// Maximum von Mises stress
    pub max_von_mises: f64,
    /// Node with maximum von Mises stress
    pub max_von_mises_node: usize,
    /// Sum of reactions [FX, FY]
    pub total_reaction: [f64; 2],
    /// Sum of applied forces [FX, FY]
    pub total_load: [f64; 2],
}

impl AnalysisSummary {
    /// Free DOFs (unknown)
    pub fn free_dofs(&self) -> usize {
        self.total_dofs - self.constrained_dofs
    }

    /// Build the summary from the per-node results
    pub fn from_nodes(nodes: &[ResultNode], num_elements: usize, constrained_dofs: usize, total_load: [f64; 2]) -> Self {
        let mut summary = Self {
            num_nodes: nodes.len(),
            num_elements,
            total_dofs: 2 * nodes.len(),
            constrained_dofs,
            total_load,
            ..Self::default()
        };

        for node in nodes {
            let disp = node.displacement.magnitude();
            if disp > summary.max_displacement || summary.max_disp_node == 0 {
                summary.max_displacement = disp;
                summary.max_disp_node = node.number;
            }
            if node.stress.von_mises > summary.max_von_mises || summary.max_von_mises_node == 0 {
                summary.max_von_mises = node.stress.von_mises;
                summary.max_von_mises_node = node.number;
            }
            summary.total_reaction[0] += node.reaction.fx;
            summary.total_reaction[1] += node.reaction.fy;
        }
        summary
    }
}

/// Serializable part of an analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: AnalysisSummary,
    pub nodes: Vec<ResultNode>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> FEMResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> FEMResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Outcome of a completed analysis
///
/// Holds the elements in their final stage, so callers can read per-point
/// strain and stress, together with the global displacement vector.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub elements: Vec<Element>,
    /// Global displacement vector indexed by DOF
    pub displacement: FEVec,
    /// Per-node results ordered by node number
    pub nodes: Vec<ResultNode>,
    pub summary: AnalysisSummary,
}

impl AnalysisResult {
    /// Results of a node by 1-based number
    pub fn node(&self, number: usize) -> Option<&ResultNode> {
        number.checked_sub(1).and_then(|i| self.nodes.get(i))
    }

    pub fn node_displacement(&self, number: usize) -> Option<NodeDisplacement> {
        self.node(number).map(|n| n.displacement)
    }

    /// Elements moved to their displaced shape, `scale` times the solution
    pub fn deformed_elements(&self, scale: f64) -> FEMResult<Vec<Element>> {
        self.elements
            .iter()
            .map(|e| e.deformed_copy(&self.displacement, scale))
            .collect()
    }

    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            summary: self.summary.clone(),
            nodes: self.nodes.clone(),
        }
    }
}
