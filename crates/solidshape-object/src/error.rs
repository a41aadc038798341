//! Accessor errors

use solidshape_core::{CodecError, Term};
use solidshape_shacl::{Cardinality, ShapeId};
use thiserror::Error;

/// Value count does not fit a field's bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CardinalityError {
    #[error("{subject} has no value for <{predicate}>")]
    Missing { subject: Term, predicate: String },

    #[error("{subject} has {count} values for single-valued <{predicate}>")]
    Multiple {
        subject: Term,
        predicate: String,
        count: usize,
    },

    #[error("{count} values exceed sh:maxCount {max} for <{predicate}> on {subject}")]
    TooMany {
        subject: Term,
        predicate: String,
        count: usize,
        max: u64,
    },
}

/// Result error of every accessor
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccessError {
    #[error(transparent)]
    Cardinality(#[from] CardinalityError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Field {field:?} is not {expected}-valued")]
    WrongValueKind { field: String, expected: &'static str },

    #[error("Field {field:?} is {cardinality:?}, which this accessor cannot write")]
    WrongCardinality { field: String, cardinality: Cardinality },

    #[error("Shape {shape} is not in the class model")]
    UnknownShape { shape: ShapeId },

    #[error("Shape <{shape}> has no field {name:?}")]
    UnknownField { shape: String, name: String },
}
