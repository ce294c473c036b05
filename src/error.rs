//! Error types for the plane FEM solver

use thiserror::Error;

use crate::elements::ElementStage;

/// Main error type for analysis operations
#[derive(Error, Debug)]
pub enum FEMError {
    #[error("Parse failure on line {line}: {message}")]
    ParseFailure { line: usize, message: String },

    #[error("Invalid material for element {element}: {reason}")]
    InvalidMaterial { element: usize, reason: String },

    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("Singular Jacobian in element {element} at integration point {point} (det = {determinant:e})")]
    SingularJacobian {
        element: usize,
        point: usize,
        determinant: f64,
    },

    #[error("Singular stiffness matrix - model may be unstable or have insufficient constraints")]
    SingularSystem,

    #[error("Element {element}: {operation} called out of order (stage {stage:?})")]
    OutOfOrderCall {
        element: usize,
        operation: &'static str,
        stage: ElementStage,
    },

    #[error("Element {element} references missing material {material}")]
    MissingMaterial { element: usize, material: usize },

    #[error("Element {element} references missing node {node}")]
    NodeNotFound { element: usize, node: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for analysis operations
pub type FEMResult<T> = Result<T, FEMError>;
