//! Boundary conditions by direct elimination

use serde::{Deserialize, Serialize};

use crate::elements::Node;
use crate::error::{FEMError, FEMResult};
use crate::math::{Mat, Vec as FEVec};

/// Global displacement, force and constraint vectors of length `2N`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConditions {
    /// Prescribed displacement per DOF, enforced where constrained, moved to the load everywhere
    pub displacement: FEVec,
    /// Applied force per DOF
    pub force: FEVec,
    /// Constraint flag per DOF
    pub constraint: Vec<bool>,
}

impl BoundaryConditions {
    /// Free, unloaded system with `dofs` degrees of freedom
    pub fn new(dofs: usize) -> Self {
        Self {
            displacement: FEVec::zeros(dofs),
            force: FEVec::zeros(dofs),
            constraint: vec![false; dofs],
        }
    }

    /// Gather the vectors from a node list ordered by node number
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut bc = Self::new(2 * nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            for axis in 0..2 {
                let dof = 2 * i + axis;
                bc.displacement[dof] = node.displacement[axis];
                bc.force[dof] = node.force[axis];
                bc.constraint[dof] = node.constraint[axis];
            }
        }
        bc
    }

    pub fn dof_count(&self) -> usize {
        self.constraint.len()
    }

    /// Number of constrained DOFs
    pub fn constrained_count(&self) -> usize {
        self.constraint.iter().filter(|&&c| c).count()
    }

    /// Indices of constrained DOFs, ascending
    pub fn constrained_dofs(&self) -> impl Iterator<Item = usize> + '_ {
        self.constraint
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| c.then_some(i))
    }

    fn check_size(&self, n: usize) -> FEMResult<()> {
        for (name, len) in [
            ("constraint vector", self.constraint.len()),
            ("displacement vector", self.displacement.len()),
            ("force vector", self.force.len()),
        ] {
            if len != n {
                return Err(FEMError::DimensionMismatch {
                    context: name.to_string(),
                    expected: n,
                    found: len,
                });
            }
        }
        Ok(())
    }
}

/// Enforce prescribed displacements on `k` and return the modified force vector
///
/// First moves the known displacements to the right-hand side using the
/// unmodified matrix (`F - K U`). Then every constrained DOF gets its row and
/// column zeroed, a unit diagonal and the prescribed value as its force, so
/// the solved value equals the prescribed one exactly.
pub fn apply_boundary_conditions(k: &mut Mat, bc: &BoundaryConditions) -> FEMResult<FEVec> {
    if k.nrows() != k.ncols() {
        return Err(FEMError::DimensionMismatch {
            context: "global stiffness matrix (square)".to_string(),
            expected: k.nrows(),
            found: k.ncols(),
        });
    }
    bc.check_size(k.nrows())?;

    // The whole displacement vector loads the system, constrained or not
    let mut f = &bc.force - &*k * &bc.displacement;

    for i in bc.constrained_dofs() {
        k.row_mut(i).fill(0.0);
        k.column_mut(i).fill(0.0);
        k[(i, i)] = 1.0;
        f[i] = bc.displacement[i];
    }

    Ok(f)
}

/// Reaction forces `K U - F` on constrained DOFs, zero on free DOFs
///
/// `k` must be the stiffness matrix before elimination.
pub fn reactions(k: &Mat, displacement: &FEVec, bc: &BoundaryConditions) -> FEMResult<FEVec> {
    bc.check_size(k.nrows())?;
    if displacement.len() != k.ncols() {
        return Err(FEMError::DimensionMismatch {
            context: "displacement vector".to_string(),
            expected: k.ncols(),
            found: displacement.len(),
        });
    }

    let residual = k * displacement - &bc.force;
    Ok(FEVec::from_iterator(
        residual.len(),
        residual
            .iter()
            .zip(&bc.constraint)
            .map(|(&r, &c)| if c { r } else { 0.0 }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{solve_linear_system, DEFAULT_SINGULAR_TOLERANCE};
    use approx::assert_relative_eq;

    fn spring_chain() -> Mat {
        // Three nodes on a line joined by unit springs, single axis each
        Mat::from_row_slice(3, 3, &[1.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 1.0])
    }

    #[test]
    fn test_from_nodes() {
        let nodes = vec![
            Node::new(1, 0.0, 0.0).fixed(),
            Node::new(2, 1.0, 0.0).with_force(3.0, -2.0),
        ];
        let bc = BoundaryConditions::from_nodes(&nodes);
        assert_eq!(bc.constraint, vec![true, true, false, false]);
        assert_eq!(bc.force[2], 3.0);
        assert_eq!(bc.force[3], -2.0);
        assert_eq!(bc.constrained_count(), 2);
        assert_eq!(bc.constrained_dofs().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_elimination_pattern() {
        let mut k = spring_chain();
        let mut bc = BoundaryConditions::new(3);
        bc.constraint[0] = true;
        bc.constraint[2] = true;
        bc.displacement[2] = 0.5;

        let f = apply_boundary_conditions(&mut k, &bc).unwrap();

        for i in [0, 2] {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(k[(i, j)], expected);
                assert_eq!(k[(j, i)], expected);
            }
        }
        assert_eq!(k[(1, 1)], 2.0);
        // F1 = 0 - K[1,2] * 0.5
        assert_relative_eq!(f[1], 0.5);
        assert_relative_eq!(f[2], 0.5);

        let u = solve_linear_system(&k, &f, DEFAULT_SINGULAR_TOLERANCE).unwrap();
        assert_relative_eq!(u[0], 0.0);
        assert_relative_eq!(u[1], 0.25, epsilon = 1e-14);
        assert_relative_eq!(u[2], 0.5);
    }

    #[test]
    fn test_unconstrained_displacement_loads_free_rows() {
        let mut k = spring_chain();
        let mut bc = BoundaryConditions::new(3);
        bc.constraint[0] = true;
        bc.displacement[1] = 9.0;
        bc.force[2] = 1.0;

        let f = apply_boundary_conditions(&mut k, &bc).unwrap();
        // F - K U with U = [0, 9, 0]
        assert_eq!(f[0], 0.0);
        assert_eq!(f[1], -18.0);
        assert_eq!(f[2], 10.0);
        // The value itself is not enforced on a free DOF
        assert_eq!(k[(1, 1)], 2.0);
    }

    #[test]
    fn test_length_mismatch() {
        let mut k = spring_chain();
        let bc = BoundaryConditions::new(4);
        assert!(matches!(
            apply_boundary_conditions(&mut k, &bc),
            Err(FEMError::DimensionMismatch { expected: 3, found: 4, .. })
        ));
    }

    #[test]
    fn test_reactions_balance_load() {
        let k_orig = spring_chain();
        let mut k = k_orig.clone();
        let mut bc = BoundaryConditions::new(3);
        bc.constraint[0] = true;
        bc.force[1] = 2.0;
        bc.force[2] = 1.0;

        let f = apply_boundary_conditions(&mut k, &bc).unwrap();
        let u = solve_linear_system(&k, &f, DEFAULT_SINGULAR_TOLERANCE).unwrap();
        let r = reactions(&k_orig, &u, &bc).unwrap();

        assert_relative_eq!(r[0], -3.0, epsilon = 1e-12);
        assert_eq!(r[1], 0.0);
        assert_eq!(r[2], 0.0);
    }
}
