//! Mesh - container for materials, nodes and element definitions

use serde::{Deserialize, Serialize};

use crate::analysis::{self, AnalysisObserver, AnalysisOptions, LogObserver};
use crate::boundary::BoundaryConditions;
use crate::elements::{Element, ElementKind, Material, Node};
use crate::error::{FEMError, FEMResult};
use crate::results::AnalysisResult;

/// Element connectivity as read from the model input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDef {
    /// 1-based element number
    pub number: usize,
    pub kind: ElementKind,
    /// 1-based node numbers, corners counter-clockwise then midside nodes
    pub nodes: Vec<usize>,
    /// 1-based material number
    pub material: usize,
}

impl ElementDef {
    /// Create a definition, picking the kind from the number of nodes
    pub fn new(number: usize, nodes: Vec<usize>, material: usize) -> FEMResult<Self> {
        let kind = ElementKind::from_node_count(nodes.len()).ok_or_else(|| {
            FEMError::InvalidInput(format!(
                "element {} has {} nodes, expected 4 or 8",
                number,
                nodes.len()
            ))
        })?;
        Ok(Self {
            number,
            kind,
            nodes,
            material,
        })
    }

    pub fn quad4(number: usize, nodes: [usize; 4], material: usize) -> Self {
        Self {
            number,
            kind: ElementKind::Quad4,
            nodes: nodes.to_vec(),
            material,
        }
    }

    pub fn quad8(number: usize, nodes: [usize; 8], material: usize) -> Self {
        Self {
            number,
            kind: ElementKind::Quad8,
            nodes: nodes.to_vec(),
            material,
        }
    }
}

/// The plane finite element model
///
/// Materials, nodes and elements are numbered from 1 in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    materials: Vec<Material>,
    nodes: Vec<Node>,
    elements: Vec<ElementDef>,
}

impl Mesh {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a material and return its 1-based number
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len()
    }

    /// Add a node; its number must be the next free one
    pub fn add_node(&mut self, node: Node) -> FEMResult<()> {
        let expected = self.nodes.len() + 1;
        if node.number != expected {
            return Err(FEMError::InvalidInput(format!(
                "node {} out of sequence, expected node {}",
                node.number, expected
            )));
        }
        if !(node.x.is_finite() && node.y.is_finite()) {
            return Err(FEMError::InvalidInput(format!(
                "node {} has non-finite coordinates",
                node.number
            )));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Add an element; its nodes and material must already exist
    pub fn add_element(&mut self, element: ElementDef) -> FEMResult<()> {
        let expected = self.elements.len() + 1;
        if element.number != expected {
            return Err(FEMError::InvalidInput(format!(
                "element {} out of sequence, expected element {}",
                element.number, expected
            )));
        }
        self.validate_element(&element)?;
        self.elements.push(element);
        Ok(())
    }

    fn validate_element(&self, element: &ElementDef) -> FEMResult<()> {
        if element.nodes.len() != element.kind.node_count() {
            return Err(FEMError::DimensionMismatch {
                context: format!("{} element {} node list", element.kind, element.number),
                expected: element.kind.node_count(),
                found: element.nodes.len(),
            });
        }
        if let Some(&node) = element.nodes.iter().find(|&&n| self.node(n).is_none()) {
            return Err(FEMError::NodeNotFound {
                element: element.number,
                node,
            });
        }
        if self.material(element.material).is_none() {
            return Err(FEMError::MissingMaterial {
                element: element.number,
                material: element.material,
            });
        }
        Ok(())
    }

    // ========================
    // Accessors
    // ========================

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[ElementDef] {
        &self.elements
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Node by 1-based number
    pub fn node(&self, number: usize) -> Option<&Node> {
        number.checked_sub(1).and_then(|i| self.nodes.get(i))
    }

    /// Mutable node by 1-based number, for editing loads and constraints
    ///
    /// Elements built before the edit keep their old snapshot.
    pub fn node_mut(&mut self, number: usize) -> Option<&mut Node> {
        number.checked_sub(1).and_then(move |i| self.nodes.get_mut(i))
    }

    /// Material by 1-based number
    pub fn material(&self, number: usize) -> Option<&Material> {
        number.checked_sub(1).and_then(|i| self.materials.get(i))
    }

    // ========================
    // Analysis
    // ========================

    /// Build fresh elements with snapshots of the current nodes
    pub fn build_elements(&self) -> FEMResult<Vec<Element>> {
        self.elements
            .iter()
            .map(|def| {
                self.validate_element(def)?;
                let snapshots = def
                    .nodes
                    .iter()
                    .filter_map(|&n| self.node(n).map(Node::snapshot))
                    .collect();
                let material = self.materials[def.material - 1];
                Element::new(def.number, def.kind, snapshots, def.material, material)
            })
            .collect()
    }

    /// Global displacement, force and constraint vectors
    pub fn boundary_conditions(&self) -> BoundaryConditions {
        BoundaryConditions::from_nodes(&self.nodes)
    }

    /// Run a linear static analysis, logging progress
    pub fn analyze(&self, options: &AnalysisOptions) -> FEMResult<AnalysisResult> {
        analysis::run(self, options, &mut LogObserver)
    }

    /// Run a linear static analysis with a custom observer
    pub fn analyze_with(
        &self,
        options: &AnalysisOptions,
        observer: &mut dyn AnalysisObserver,
    ) -> FEMResult<AnalysisResult> {
        analysis::run(self, options, observer)
    }
}
