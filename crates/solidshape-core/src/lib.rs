//! # solidshape core
//!
//! RDF terms, a mutable indexed triple graph and the literal codec registry
//! shared by the shape compiler and the object runtime.

pub mod model;
pub mod store;
pub mod shared;
pub mod codec;
pub mod vocab;

pub use model::{Literal, Term, Triple};
pub use store::{Graph, Seq};
pub use shared::SharedGraph;
pub use codec::{Codec, CodecId, FromNative, NativeValue};

use thiserror::Error;

/// Errors raised at the literal encode/decode boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("Unsupported datatype: <{datatype}>")]
    UnsupportedDatatype { datatype: String },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Invalid lexical form {lexical:?} for <{datatype}>")]
    InvalidLexicalForm { lexical: String, datatype: String },
}
