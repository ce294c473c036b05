//! Stress recovery and nodal averaging

use log::warn;

use crate::elements::{Element, ElementStage};
use crate::error::{FEMError, FEMResult};
use crate::math::{Vec as FEVec, Vec3};

/// Run strain, stress and nodal extrapolation on every element
pub fn recover_element_stresses(elements: &mut [Element], displacement: &FEVec) -> FEMResult<()> {
    for element in elements.iter_mut() {
        let local = element.gather_displacement(displacement)?;
        element.compute_strain(&local)?;
        element.compute_stress()?;
        element.compute_nodal_stress()?;
    }
    Ok(())
}

/// Arithmetic mean of the extrapolated stress every element contributes to a node
///
/// Indexed by `node - 1`. Nodes no element references get a zero stress.
pub fn average_nodal_stresses(elements: &[Element], node_count: usize) -> FEMResult<Vec<Vec3>> {
    let mut sums = vec![Vec3::zeros(); node_count];
    let mut counts = vec![0usize; node_count];

    for element in elements {
        if element.stage() < ElementStage::NodalStressComputed {
            return Err(FEMError::OutOfOrderCall {
                element: element.number,
                operation: "average_nodal_stresses",
                stage: element.stage(),
            });
        }

        for (node, stress) in element.nodes().iter().zip(element.nodal_stresses()) {
            let index = node.number.checked_sub(1).filter(|&i| i < node_count).ok_or(
                FEMError::NodeNotFound {
                    element: element.number,
                    node: node.number,
                },
            )?;
            sums[index] += stress;
            counts[index] += 1;
        }
    }

    Ok(sums
        .into_iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (sum, count))| {
            if count == 0 {
                warn!("Node {} is not referenced by any element, stress set to zero", i + 1);
                Vec3::zeros()
            } else {
                sum / count as f64
            }
        })
        .collect())
}

/// Principal stresses of a plane stress state, largest first
pub fn principal_stresses(sx: f64, sy: f64, txy: f64) -> (f64, f64) {
    let center = (sx + sy) / 2.0;
    let radius = ((sx - sy).powi(2) / 4.0 + txy.powi(2)).sqrt();
    (center + radius, center - radius)
}

/// Von Mises equivalent stress from the principal pair
pub fn von_mises(s1: f64, s2: f64) -> f64 {
    ((s1.powi(2) + s2.powi(2) + (s2 - s1).powi(2)) / 2.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementKind, Material, NodeSnapshot};
    use approx::assert_relative_eq;

    fn snap(number: usize, x: f64, y: f64) -> NodeSnapshot {
        NodeSnapshot {
            number,
            x,
            y,
            constraint: [false, false],
        }
    }

    #[test]
    fn test_uniaxial_stress() {
        let (s1, s2) = principal_stresses(10.0, 0.0, 0.0);
        assert_relative_eq!(s1, 10.0);
        assert_relative_eq!(s2, 0.0);
        assert_relative_eq!(von_mises(s1, s2), 10.0);
    }

    #[test]
    fn test_pure_shear() {
        let (s1, s2) = principal_stresses(0.0, 0.0, 5.0);
        assert_relative_eq!(s1, 5.0);
        assert_relative_eq!(s2, -5.0);
        assert_relative_eq!(von_mises(s1, s2), 5.0 * 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_principal_ordering() {
        let (s1, s2) = principal_stresses(-4.0, 7.0, 2.5);
        assert!(s1 >= s2);
        assert_relative_eq!(s1 + s2, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_average_requires_nodal_stress() {
        let nodes = vec![snap(1, 0.0, 0.0), snap(2, 1.0, 0.0), snap(3, 1.0, 1.0), snap(4, 0.0, 1.0)];
        let element = Element::new(1, ElementKind::Quad4, nodes, 1, Material::default()).unwrap();
        assert!(matches!(
            average_nodal_stresses(&[element], 4),
            Err(FEMError::OutOfOrderCall { stage: ElementStage::Built, .. })
        ));
    }

    #[test]
    fn test_shared_nodes_averaged_orphans_zero() {
        let material = Material::new(100.0, 0.0, 1.0);
        let pts = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0), (1.0, 1.0), (2.0, 1.0)];
        let nodes = |ids: [usize; 4]| ids.iter().map(|&i| snap(i, pts[i - 1].0, pts[i - 1].1)).collect();
        let mut elements = vec![
            Element::new(1, ElementKind::Quad4, nodes([1, 2, 5, 4]), 1, material).unwrap(),
            Element::new(2, ElementKind::Quad4, nodes([2, 3, 6, 5]), 1, material).unwrap(),
        ];
        for e in elements.iter_mut() {
            e.compute_stiffness().unwrap();
        }

        // u = 0.01 x on six nodes plus an unused seventh node
        let mut u = FEVec::zeros(14);
        for (i, p) in pts.iter().enumerate() {
            u[2 * i] = 0.01 * p.0;
        }
        recover_element_stresses(&mut elements, &u).unwrap();

        let averaged = average_nodal_stresses(&elements, 7).unwrap();
        for s in &averaged[..6] {
            assert_relative_eq!(s[0], 1.0, epsilon = 1e-10);
            assert_relative_eq!(s[1], 0.0, epsilon = 1e-10);
        }
        assert_eq!(averaged[6], Vec3::zeros());
    }
}
