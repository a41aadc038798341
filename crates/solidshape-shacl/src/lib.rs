//! SHACL shape compiler
//!
//! Compiles the node and property shapes found in an RDF graph into a
//! [`ClassModel`]: one [`NodeShapeDescriptor`] per node shape, with named,
//! typed fields that the object runtime binds to instance data.
//! - Shape loading ([`loader`])
//! - Type resolution and model building ([`builder`])
//! - Field naming ([`naming`])

pub mod builder;
pub mod config;
pub mod loader;
pub mod model;
pub mod naming;

// Re-exports
pub use builder::{compile_shapes, CompileReport, ShapeCompiler};
pub use config::{CompilerConfig, ErrorPolicy, NameCase};
pub use loader::{DefaultShapeLoader, NodeShape, PropertyShape, ShapeLoader, ShapesGraph, ValueRef};
pub use model::{Cardinality, ClassModel, FieldDescriptor, NodeShapeDescriptor, ShapeId, ValueKind};

use thiserror::Error;

/// Shape compilation errors
///
/// `shape` is the node shape IRI; `property` identifies the property shape,
/// by path where one exists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("Property shape {property} of <{shape}> has no IRI sh:path")]
    MissingPath { shape: String, property: String },

    #[error("Property <{property}> of <{shape}> declares both sh:datatype and a shape reference")]
    AmbiguousMapping { shape: String, property: String },

    #[error("Invalid cardinality on <{property}> of <{shape}>: {reason}")]
    InvalidCardinality {
        shape: String,
        property: String,
        reason: String,
    },

    #[error("Field name {name:?} of <{shape}> is derived more than once (at <{property}>)")]
    DuplicateName {
        shape: String,
        property: String,
        name: String,
    },

    #[error("Property <{property}> of <{shape}> references unknown or rejected shape <{reference}>")]
    UnresolvedShapeReference {
        shape: String,
        property: String,
        reference: String,
    },
}

impl ShapeError {
    /// Node shape the error belongs to
    pub fn shape(&self) -> &str {
        match self {
            ShapeError::MissingPath { shape, .. }
            | ShapeError::AmbiguousMapping { shape, .. }
            | ShapeError::InvalidCardinality { shape, .. }
            | ShapeError::DuplicateName { shape, .. }
            | ShapeError::UnresolvedShapeReference { shape, .. } => shape,
        }
    }
}
