//! Analysis options, observer checkpoints and the linear static pipeline

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::assembly;
use crate::boundary::{self, apply_boundary_conditions};
use crate::elements::Element;
use crate::error::{FEMError, FEMResult};
use crate::math::{self, Mat, Vec as FEVec};
use crate::model::Mesh;
use crate::postprocess::{average_nodal_stresses, recover_element_stresses};
use crate::results::{
    AnalysisResult, AnalysisSummary, NodalStress, NodeDisplacement, Reactions, ResultNode,
};

/// Options for linear static analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Evaluate element stiffness matrices on the rayon thread pool
    pub parallel: bool,
    /// Relative pivot threshold below which the system counts as singular
    pub singular_tolerance: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
            singular_tolerance: math::DEFAULT_SINGULAR_TOLERANCE,
        }
    }
}

impl AnalysisOptions {
    /// Create default options
    pub fn linear() -> Self {
        Self::default()
    }

    /// Evaluate everything on the calling thread
    pub fn serial(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the singular pivot tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.singular_tolerance = tol;
        self
    }
}

/// Checkpoints of an analysis run
///
/// All methods default to doing nothing, implement the ones you need.
pub trait AnalysisObserver {
    /// Called once per element, in element order, after its stiffness is known
    fn element_stiffness_computed(&mut self, _element: &Element, _stiffness: &Mat) {}

    fn system_assembled(&mut self, _stiffness: &Mat) {}

    /// Receives the eliminated matrix and the modified force vector
    fn boundary_conditions_applied(&mut self, _stiffness: &Mat, _force: &FEVec) {}

    fn solved(&mut self, _displacement: &FEVec) {}

    fn stresses_recovered(&mut self, _elements: &[Element]) {}
}

/// Observer that reports progress through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl AnalysisObserver for LogObserver {
    fn element_stiffness_computed(&mut self, element: &Element, stiffness: &Mat) {
        debug!(
            "Element {} ({}): stiffness {}x{}, min det(J) {:e}",
            element.number,
            element.kind(),
            stiffness.nrows(),
            stiffness.ncols(),
            element
                .jacobian_determinants()
                .iter()
                .fold(f64::INFINITY, |m, &d| m.min(d)),
        );
    }

    fn system_assembled(&mut self, stiffness: &Mat) {
        info!("Assembled global stiffness: {} DOFs", stiffness.nrows());
    }

    fn boundary_conditions_applied(&mut self, _stiffness: &Mat, force: &FEVec) {
        info!("Boundary conditions applied, |F| = {:e}", force.norm());
    }

    fn solved(&mut self, displacement: &FEVec) {
        info!("Solved displacements, max |u| = {:e}", displacement.amax());
    }

    fn stresses_recovered(&mut self, elements: &[Element]) {
        info!("Recovered stresses in {} elements", elements.len());
    }
}

/// Run a linear static analysis of `mesh`
///
/// Builds the elements, assembles and eliminates the global system, solves it
/// and recovers averaged nodal stresses and reactions.
pub fn run(
    mesh: &Mesh,
    options: &AnalysisOptions,
    observer: &mut dyn AnalysisObserver,
) -> FEMResult<AnalysisResult> {
    let node_count = mesh.node_count();
    if node_count == 0 {
        return Err(FEMError::InvalidInput("model has no nodes".to_string()));
    }

    let mut elements = mesh.build_elements()?;

    let matrices = assembly::compute_element_stiffness(&mut elements, options.parallel)?;
    for (element, ke) in elements.iter().zip(&matrices) {
        observer.element_stiffness_computed(element, ke);
    }

    let k_original = assembly::assemble_matrices(&elements, &matrices, node_count)?;
    observer.system_assembled(&k_original);

    let bc = mesh.boundary_conditions();
    let mut k = k_original.clone();
    let f = apply_boundary_conditions(&mut k, &bc)?;
    observer.boundary_conditions_applied(&k, &f);

    let displacement = math::solve_linear_system(&k, &f, options.singular_tolerance)?;
    observer.solved(&displacement);

    recover_element_stresses(&mut elements, &displacement)?;
    let averaged = average_nodal_stresses(&elements, node_count)?;
    observer.stresses_recovered(&elements);

    let reactions = boundary::reactions(&k_original, &displacement, &bc)?;

    let nodes: Vec<ResultNode> = averaged
        .iter()
        .enumerate()
        .map(|(i, s)| ResultNode {
            number: i + 1,
            displacement: NodeDisplacement::from_array([displacement[2 * i], displacement[2 * i + 1]]),
            stress: NodalStress::from_components(s[0], s[1], s[2]),
            reaction: Reactions::from_array([reactions[2 * i], reactions[2 * i + 1]]),
        })
        .collect();

    let total_load = (0..node_count).fold([0.0, 0.0], |acc, i| {
        [acc[0] + bc.force[2 * i], acc[1] + bc.force[2 * i + 1]]
    });
    let summary = AnalysisSummary::from_nodes(&nodes, elements.len(), bc.constrained_count(), total_load);

    info!(
        "Analysis complete: max displacement {:e} at node {}, max von Mises {:e} at node {}",
        summary.max_displacement, summary.max_disp_node, summary.max_von_mises, summary.max_von_mises_node
    );

    Ok(AnalysisResult {
        elements,
        displacement,
        nodes,
        summary,
    })
}
