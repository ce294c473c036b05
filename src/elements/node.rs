//! Node - a point in the plane with its boundary conditions

use serde::{Deserialize, Serialize};

/// A 2D node in the finite element model
///
/// Nodes are numbered from 1 and the number must match the node's position
/// in the model's node list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// 1-based node number
    pub number: usize,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Constraint flags [X, Y]
    pub constraint: [bool; 2],
    /// Prescribed displacement [X, Y] (enforced only where constrained)
    pub displacement: [f64; 2],
    /// Applied force [FX, FY]
    pub force: [f64; 2],
}

impl Node {
    /// Create a new free, unloaded node
    pub fn new(number: usize, x: f64, y: f64) -> Self {
        Self {
            number,
            x,
            y,
            constraint: [false, false],
            displacement: [0.0, 0.0],
            force: [0.0, 0.0],
        }
    }

    /// Fix both translations
    pub fn fixed(mut self) -> Self {
        self.constraint = [true, true];
        self
    }

    /// Set the constraint flags
    pub fn with_constraint(mut self, x: bool, y: bool) -> Self {
        self.constraint = [x, y];
        self
    }

    /// Set the prescribed displacement
    pub fn with_displacement(mut self, ux: f64, uy: f64) -> Self {
        self.displacement = [ux, uy];
        self
    }

    /// Set the applied force
    pub fn with_force(mut self, fx: f64, fy: f64) -> Self {
        self.force = [fx, fy];
        self
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Copy of the geometry and identity an element keeps
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            number: self.number,
            x: self.x,
            y: self.y,
            constraint: self.constraint,
        }
    }
}

/// Read-only copy of a node taken when an element is built.
///
/// Later edits to the model's node list do not reach elements that were
/// already built from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// 1-based node number, used to find the node's global DOFs
    pub number: usize,
    pub x: f64,
    pub y: f64,
    pub constraint: [bool; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(3, 1.0, 2.0).with_constraint(true, false).with_force(0.0, -5.0);
        assert_eq!(node.number, 3);
        assert_eq!(node.coords(), [1.0, 2.0]);
        assert_eq!(node.constraint, [true, false]);
        assert_eq!(node.force, [0.0, -5.0]);
    }

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(1, 0.0, 0.0);
        let n2 = Node::new(2, 3.0, 4.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut node = Node::new(1, 1.0, 1.0).fixed();
        let snap = node.snapshot();
        node.x = 10.0;
        assert_eq!(snap.x, 1.0);
        assert_eq!(snap.constraint, [true, true]);
    }
}
