//! Global stiffness assembly
//!
//! Element stiffness matrices are scatter-added into the dense `2N x 2N`
//! global matrix. Local row `r` of an element maps to global row
//! `2 * (node(r / 2) - 1) + r % 2`.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::elements::Element;
use crate::error::{FEMError, FEMResult};
use crate::math::Mat;

/// Global DOF index of a 1-based node number and axis (0 = x, 1 = y)
#[inline]
pub fn dof_index(node: usize, axis: usize) -> usize {
    2 * (node - 1) + axis
}

/// Evaluate every element stiffness matrix in element order
///
/// With `parallel` set (and the `parallel` feature compiled in) the elements
/// are evaluated on the rayon thread pool. Either way the error reported is
/// that of the lowest-indexed failing element.
pub fn compute_element_stiffness(elements: &mut [Element], parallel: bool) -> FEMResult<Vec<Mat>> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            let results: Vec<FEMResult<Mat>> = elements
                .par_iter_mut()
                .map(Element::compute_stiffness)
                .collect();
            return results.into_iter().collect();
        }
    }

    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    elements.iter_mut().map(Element::compute_stiffness).collect()
}

/// Scatter-add one element matrix into the global stiffness matrix
pub fn scatter_element(k_global: &mut Mat, element: &Element, ke: &Mat) -> FEMResult<()> {
    let n = element.dof_count();
    if ke.nrows() != n || ke.ncols() != n {
        return Err(FEMError::DimensionMismatch {
            context: format!("stiffness matrix of element {}", element.number),
            expected: n,
            found: if ke.nrows() != n { ke.nrows() } else { ke.ncols() },
        });
    }

    let dofs = element.dof_indices();
    if let Some(&max) = dofs.iter().max() {
        if max >= k_global.nrows() {
            let node = max / 2 + 1;
            return Err(FEMError::NodeNotFound {
                element: element.number,
                node,
            });
        }
    }

    for (r, &gr) in dofs.iter().enumerate() {
        for (c, &gc) in dofs.iter().enumerate() {
            k_global[(gr, gc)] += ke[(r, c)];
        }
    }
    Ok(())
}

/// Assemble precomputed element matrices into a `2N x 2N` global matrix
pub fn assemble_matrices(elements: &[Element], matrices: &[Mat], node_count: usize) -> FEMResult<Mat> {
    if elements.len() != matrices.len() {
        return Err(FEMError::DimensionMismatch {
            context: "element stiffness matrices".to_string(),
            expected: elements.len(),
            found: matrices.len(),
        });
    }

    let n_dofs = 2 * node_count;
    let mut k_global = Mat::zeros(n_dofs, n_dofs);
    for (element, ke) in elements.iter().zip(matrices) {
        scatter_element(&mut k_global, element, ke)?;
    }
    Ok(k_global)
}

/// Compute every element stiffness and assemble the global stiffness matrix
pub fn assemble(elements: &mut [Element], node_count: usize, parallel: bool) -> FEMResult<Mat> {
    let matrices = compute_element_stiffness(elements, parallel)?;
    assemble_matrices(elements, &matrices, node_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementKind, Material, NodeSnapshot};
    use crate::math::is_symmetric;
    use approx::assert_relative_eq;

    fn snap(number: usize, x: f64, y: f64) -> NodeSnapshot {
        NodeSnapshot {
            number,
            x,
            y,
            constraint: [false, false],
        }
    }

    fn two_element_strip() -> Vec<Element> {
        let pts = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0), (1.0, 1.0), (2.0, 1.0)];
        let nodes = |ids: [usize; 4]| ids.iter().map(|&i| snap(i, pts[i - 1].0, pts[i - 1].1)).collect();
        let material = Material::new(1.0, 0.0, 1.0);
        vec![
            Element::new(1, ElementKind::Quad4, nodes([1, 2, 5, 4]), 1, material).unwrap(),
            Element::new(2, ElementKind::Quad4, nodes([2, 3, 6, 5]), 1, material).unwrap(),
        ]
    }

    #[test]
    fn test_dof_index() {
        assert_eq!(dof_index(1, 0), 0);
        assert_eq!(dof_index(1, 1), 1);
        assert_eq!(dof_index(4, 1), 7);
    }

    #[test]
    fn test_shared_node_stiffness_adds() {
        let mut elements = two_element_strip();
        let k = assemble(&mut elements, 6, false).unwrap();
        assert_eq!(k.nrows(), 12);
        assert!(is_symmetric(&k, 1e-12));

        // Node 2 is corner 2 of element 1 and corner 1 of element 2
        let ux2 = dof_index(2, 0);
        assert_relative_eq!(k[(ux2, ux2)], 1.0, epsilon = 1e-12);
        // Node 1 belongs to a single element
        assert_relative_eq!(k[(0, 0)], 0.5, epsilon = 1e-12);
        // Nodes 1 and 3 share no element
        assert_eq!(k[(dof_index(1, 0), dof_index(3, 0))], 0.0);
    }

    #[test]
    fn test_rigid_translation_has_no_force() {
        let mut elements = two_element_strip();
        let k = assemble(&mut elements, 6, false).unwrap();
        let u = crate::math::Vec::from_fn(12, |i, _| if i % 2 == 0 { 1.0 } else { 0.0 });
        assert_relative_eq!((&k * u).norm(), 0.0, epsilon = 1e-12);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let mut serial = two_element_strip();
        let mut parallel = two_element_strip();
        let ks = assemble(&mut serial, 6, false).unwrap();
        let kp = assemble(&mut parallel, 6, true).unwrap();
        assert_relative_eq!((ks - kp).amax(), 0.0);
    }

    #[test]
    fn test_first_failing_element_reported() {
        for parallel in [false, true] {
            let mut elements = two_element_strip();
            elements.extend(two_element_strip());
            elements[2].number = 3;
            elements[3].number = 4;
            for e in [1, 3] {
                let nodes = elements[e].nodes().to_vec();
                let reversed = vec![nodes[0], nodes[3], nodes[2], nodes[1]];
                elements[e] =
                    Element::new(e + 1, ElementKind::Quad4, reversed, 1, Material::default()).unwrap();
            }
            assert!(matches!(
                compute_element_stiffness(&mut elements, parallel),
                Err(FEMError::SingularJacobian { element: 2, .. })
            ));
        }
    }

    #[test]
    fn test_node_outside_system() {
        let mut elements = two_element_strip();
        assert!(matches!(
            assemble(&mut elements, 5, false),
            Err(FEMError::NodeNotFound { element: 2, node: 6 })
        ));
    }

    #[test]
    fn test_wrong_matrix_size() {
        let elements = two_element_strip();
        let mut k = Mat::zeros(12, 12);
        assert!(matches!(
            scatter_element(&mut k, &elements[0], &Mat::zeros(6, 6)),
            Err(FEMError::DimensionMismatch { expected: 8, found: 6, .. })
        ));
    }
}
