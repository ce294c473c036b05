//! Isoparametric quadrilateral element shared by Quad4 and Quad8
//!
//! An element owns snapshots of its nodes and walks through a fixed sequence
//! of stages:
//!
//! ```text
//! Built -> StiffnessComputed -> StrainComputed -> StressComputed -> NodalStressComputed
//! ```
//!
//! Each computation requires the previous stage. Calling one early returns
//! [`FEMError::OutOfOrderCall`] instead of silently skipping. Re-running an
//! earlier stage discards everything computed after it.

use serde::{Deserialize, Serialize};

use super::{ElementKind, GaussPoint, Material, NodeSnapshot};
use crate::error::{FEMError, FEMResult};
use crate::math::{Mat, Mat2, Mat3, Vec as FEVec, Vec3};

/// Progress of an element through the stress recovery pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElementStage {
    Built,
    StiffnessComputed,
    StrainComputed,
    StressComputed,
    NodalStressComputed,
}

/// A 4- or 8-node plane quadrilateral
#[derive(Debug, Clone)]
pub struct Element {
    /// 1-based element number
    pub number: usize,
    kind: ElementKind,
    nodes: std::vec::Vec<NodeSnapshot>,
    material_number: usize,
    material: Material,
    gauss_points: std::vec::Vec<GaussPoint>,
    stage: ElementStage,

    constitutive: Mat3,
    strain_displacement: std::vec::Vec<Mat>,
    jacobian_determinants: std::vec::Vec<f64>,
    strains: std::vec::Vec<Vec3>,
    stresses: std::vec::Vec<Vec3>,
    nodal_stresses: std::vec::Vec<Vec3>,
}

impl Element {
    /// Build an element from node snapshots in natural-coordinate order
    pub fn new(
        number: usize,
        kind: ElementKind,
        nodes: std::vec::Vec<NodeSnapshot>,
        material_number: usize,
        material: Material,
    ) -> FEMResult<Self> {
        if nodes.len() != kind.node_count() {
            return Err(FEMError::DimensionMismatch {
                context: format!("{kind} element {number} node list"),
                expected: kind.node_count(),
                found: nodes.len(),
            });
        }

        Ok(Self {
            number,
            kind,
            nodes,
            material_number,
            material,
            gauss_points: kind.gauss_points(),
            stage: ElementStage::Built,
            constitutive: Mat3::zeros(),
            strain_displacement: std::vec::Vec::new(),
            jacobian_determinants: std::vec::Vec::new(),
            strains: std::vec::Vec::new(),
            stresses: std::vec::Vec::new(),
            nodal_stresses: std::vec::Vec::new(),
        })
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn stage(&self) -> ElementStage {
        self.stage
    }

    /// Node snapshots in natural-coordinate order
    pub fn nodes(&self) -> &[NodeSnapshot] {
        &self.nodes
    }

    /// 1-based number of the material this element was built with
    pub fn material_number(&self) -> usize {
        self.material_number
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn dof_count(&self) -> usize {
        2 * self.nodes.len()
    }

    pub fn gauss_points(&self) -> &[GaussPoint] {
        &self.gauss_points
    }

    /// Constitutive matrix, available once the stiffness has been computed
    pub fn constitutive_matrix(&self) -> Option<&Mat3> {
        (self.stage >= ElementStage::StiffnessComputed).then_some(&self.constitutive)
    }

    /// Strain-displacement matrices per integration point
    pub fn strain_displacement(&self) -> &[Mat] {
        &self.strain_displacement
    }

    /// det(J) per integration point
    pub fn jacobian_determinants(&self) -> &[f64] {
        &self.jacobian_determinants
    }

    /// Strain (εx, εy, γxy) per integration point
    pub fn strains(&self) -> &[Vec3] {
        &self.strains
    }

    /// Stress (σx, σy, τxy) per integration point
    pub fn stresses(&self) -> &[Vec3] {
        &self.stresses
    }

    /// Extrapolated stress per node, in node order
    pub fn nodal_stresses(&self) -> &[Vec3] {
        &self.nodal_stresses
    }

    /// Global DOF indices of this element in local DOF order
    pub fn dof_indices(&self) -> std::vec::Vec<usize> {
        self.nodes
            .iter()
            .flat_map(|n| [2 * (n.number - 1), 2 * (n.number - 1) + 1])
            .collect()
    }

    /// Pick this element's displacements out of a global vector
    pub fn gather_displacement(&self, global: &FEVec) -> FEMResult<FEVec> {
        let dofs = self.dof_indices();
        if let Some(&max) = dofs.iter().max() {
            if max >= global.len() {
                return Err(FEMError::DimensionMismatch {
                    context: format!("global displacement vector for element {}", self.number),
                    expected: max + 1,
                    found: global.len(),
                });
            }
        }
        Ok(FEVec::from_iterator(dofs.len(), dofs.iter().map(|&d| global[d])))
    }

    /// Physical position of each integration point
    pub fn integration_point_positions(&self) -> std::vec::Vec<[f64; 2]> {
        self.gauss_points
            .iter()
            .map(|p| {
                let n = self.kind.shape_functions(p.xi, p.eta);
                n.iter().zip(&self.nodes).fold([0.0, 0.0], |acc, (ni, node)| {
                    [acc[0] + ni * node.x, acc[1] + ni * node.y]
                })
            })
            .collect()
    }

    /// Jacobian J = Σ [dNi/dξ; dNi/dη] ⊗ (xi, yi)
    fn jacobian(&self, derivatives: &[[f64; 2]]) -> Mat2 {
        let mut j = Mat2::zeros();
        for (d, node) in derivatives.iter().zip(&self.nodes) {
            j[(0, 0)] += d[0] * node.x;
            j[(0, 1)] += d[0] * node.y;
            j[(1, 0)] += d[1] * node.x;
            j[(1, 1)] += d[1] * node.y;
        }
        j
    }

    /// B matrix and det(J) at one integration point
    fn strain_displacement_at(&self, index: usize, point: &GaussPoint) -> FEMResult<(Mat, f64)> {
        let derivatives = self.kind.natural_derivatives(point.xi, point.eta);
        let j = self.jacobian(&derivatives);

        let det = j.determinant();
        if det <= 0.0 || !det.is_finite() {
            return Err(FEMError::SingularJacobian {
                element: self.number,
                point: index,
                determinant: det,
            });
        }

        #[rustfmt::skip]
        let j_inv = Mat2::new(
             j[(1, 1)] / det, -j[(0, 1)] / det,
            -j[(1, 0)] / det,  j[(0, 0)] / det,
        );

        let mut b = Mat::zeros(3, self.dof_count());
        for (i, d) in derivatives.iter().enumerate() {
            let dndx = j_inv[(0, 0)] * d[0] + j_inv[(0, 1)] * d[1];
            let dndy = j_inv[(1, 0)] * d[0] + j_inv[(1, 1)] * d[1];

            b[(0, 2 * i)] = dndx;
            b[(1, 2 * i + 1)] = dndy;
            b[(2, 2 * i)] = dndy;
            b[(2, 2 * i + 1)] = dndx;
        }

        Ok((b, det))
    }

    /// Compute the element stiffness matrix
    ///
    /// Ke = Σ t · wi · wj · det(J) · Bᵀ D B over the integration points.
    /// Stores D, B and det(J) for the later stress recovery stages.
    pub fn compute_stiffness(&mut self) -> FEMResult<Mat> {
        let d = self.material.constitutive_matrix(self.number)?;
        let d_dyn = Mat::from_iterator(3, 3, d.iter().copied());

        let n_points = self.gauss_points.len();
        let mut b_matrices = std::vec::Vec::with_capacity(n_points);
        let mut determinants = std::vec::Vec::with_capacity(n_points);
        let mut ke = Mat::zeros(self.dof_count(), self.dof_count());

        for (i, point) in self.gauss_points.iter().enumerate() {
            let (b, det) = self.strain_displacement_at(i, point)?;
            let coef = self.material.thickness * point.wi * point.wj * det;
            ke += (b.transpose() * &d_dyn * &b) * coef;
            b_matrices.push(b);
            determinants.push(det);
        }

        self.constitutive = d;
        self.strain_displacement = b_matrices;
        self.jacobian_determinants = determinants;
        self.strains.clear();
        self.stresses.clear();
        self.nodal_stresses.clear();
        self.stage = ElementStage::StiffnessComputed;

        Ok(ke)
    }

    fn require(&self, stage: ElementStage, operation: &'static str) -> FEMResult<()> {
        if self.stage < stage {
            return Err(FEMError::OutOfOrderCall {
                element: self.number,
                operation,
                stage: self.stage,
            });
        }
        Ok(())
    }

    /// Integration point strains ε = B · u from the element displacement vector
    pub fn compute_strain(&mut self, displacement: &FEVec) -> FEMResult<()> {
        self.require(ElementStage::StiffnessComputed, "compute_strain")?;
        if displacement.len() != self.dof_count() {
            return Err(FEMError::DimensionMismatch {
                context: format!("element {} displacement vector", self.number),
                expected: self.dof_count(),
                found: displacement.len(),
            });
        }

        self.strains = self
            .strain_displacement
            .iter()
            .map(|b| {
                let e = b * displacement;
                Vec3::new(e[0], e[1], e[2])
            })
            .collect();
        self.stresses.clear();
        self.nodal_stresses.clear();
        self.stage = ElementStage::StrainComputed;
        Ok(())
    }

    /// Integration point stresses σ = D · ε
    pub fn compute_stress(&mut self) -> FEMResult<()> {
        self.require(ElementStage::StrainComputed, "compute_stress")?;

        self.stresses = self.strains.iter().map(|e| self.constitutive * e).collect();
        self.nodal_stresses.clear();
        self.stage = ElementStage::StressComputed;
        Ok(())
    }

    /// Mean stress over all integration points
    pub fn average_stress(&self) -> FEMResult<Vec3> {
        self.require(ElementStage::StressComputed, "average_stress")?;
        let sum = self.stresses.iter().fold(Vec3::zeros(), |acc, s| acc + s);
        Ok(sum / self.stresses.len() as f64)
    }

    /// Extrapolate integration point stress to the nodes
    ///
    /// node_k = avg + cof · (σ[map[k]] - avg), with the per-kind map and
    /// coefficient from the element formulation.
    pub fn compute_nodal_stress(&mut self) -> FEMResult<()> {
        self.require(ElementStage::StressComputed, "compute_nodal_stress")?;

        let average = self.average_stress()?;
        let cof = self.kind.extrapolation_coefficient();

        self.nodal_stresses = self
            .kind
            .extrapolation_map()
            .iter()
            .map(|&p| average + (self.stresses[p] - average) * cof)
            .collect();
        self.stage = ElementStage::NodalStressComputed;
        Ok(())
    }

    /// Copy of this element with every node moved by `scale` times its
    /// displacement in the global vector.
    ///
    /// The copy starts over at [`ElementStage::Built`]; this element is not
    /// touched.
    pub fn deformed_copy(&self, displacement: &FEVec, scale: f64) -> FEMResult<Element> {
        let local = self.gather_displacement(displacement)?;
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| NodeSnapshot {
                x: n.x + scale * local[2 * i],
                y: n.y + scale * local[2 * i + 1],
                ..*n
            })
            .collect();
        Element::new(self.number, self.kind, nodes, self.material_number, self.material)
    }
}
