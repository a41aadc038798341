//! # solidshape
//!
//! Compile SHACL node shapes into a class model, then read and write RDF
//! data through typed, shape-bound instance views.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use solidshape::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let shapes = Graph::new(); // node shapes, loaded by the host
//!     let model = Arc::new(compile_shapes(&shapes)?);
//!
//!     let graph = SharedGraph::new(Graph::new());
//!     let person = model.shape_id("http://example.org/PersonShape").ok_or("no such shape")?;
//!     let people = ShapeDataset::new(graph, model, person)?;
//!
//!     let alice = people.create(Term::iri("http://example.org/alice"))?;
//!     alice.write_singular(alice.field("name")?, "Alice")?;
//!
//!     let json = JsonLdProjector::new().project(&alice)?;
//!     println!("{}", solidshape::object::to_string_pretty(&json));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`solidshape-core`**: RDF terms, the mutable triple graph and literal codecs
//! - **`solidshape-shacl`**: Shape loading and class model compilation
//! - **`solidshape-object`**: Instance accessors, datasets and JSON-LD projection
//!
//! ## Feature Flags
//!
//! - `full` (default): All crates included
//! - `core`: Terms, graph and codecs only
//! - `shacl`: Shape compiler (implies `core`)
//! - `object`: Object runtime (implies `shacl`)

#[cfg(feature = "solidshape-core")]
pub use solidshape_core as core;

#[cfg(feature = "solidshape-shacl")]
pub use solidshape_shacl as shacl;

#[cfg(feature = "solidshape-object")]
pub use solidshape_object as object;

// Convenience re-exports for common types
#[cfg(feature = "solidshape-core")]
pub use solidshape_core::{CodecError, Graph, Literal, NativeValue, SharedGraph, Term, Triple};

#[cfg(feature = "solidshape-shacl")]
pub use solidshape_shacl::{compile_shapes, ClassModel, CompilerConfig, ShapeCompiler, ShapeError, ShapeId};

#[cfg(feature = "solidshape-object")]
pub use solidshape_object::{AccessError, Instance, JsonLdProjector, ShapeDataset};

// Commonly used external dependencies
pub use serde;
pub use serde_json;

/// Prelude module for convenient imports
///
/// ```rust
/// use solidshape::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "solidshape-core")]
    pub use crate::{CodecError, Graph, Literal, NativeValue, SharedGraph, Term, Triple};

    #[cfg(feature = "solidshape-shacl")]
    pub use crate::{compile_shapes, ClassModel, CompilerConfig, ShapeCompiler, ShapeError, ShapeId};
    #[cfg(feature = "solidshape-shacl")]
    pub use solidshape_shacl::{Cardinality, ErrorPolicy, FieldDescriptor, NameCase};

    #[cfg(feature = "solidshape-object")]
    pub use crate::{AccessError, Instance, JsonLdProjector, ShapeDataset};
    #[cfg(feature = "solidshape-object")]
    pub use solidshape_object::{CardinalityError, Selector};

    pub use serde_json::Value;
}

/// Current version of solidshape
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Datatype IRIs with a registered literal codec
#[cfg(feature = "solidshape-core")]
pub fn supported_datatypes() -> Vec<&'static str> {
    solidshape_core::codec::supported_datatypes()
}
