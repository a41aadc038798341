//! # solidshape object runtime
//!
//! Typed views over a mutable RDF graph, driven by a compiled [`ClassModel`]:
//! - [`Instance`]: per-field read/write accessors for one subject
//! - [`ShapeDataset`]: lazy enumeration and creation of a shape's instances
//! - [`JsonLdProjector`]: JSON-LD output of instances and datasets
//!
//! Everything here is single-threaded. Instances share one [`SharedGraph`]
//! and only borrow it for the duration of a single accessor call.
//!
//! [`ClassModel`]: solidshape_shacl::ClassModel
//! [`SharedGraph`]: solidshape_core::SharedGraph

pub mod dataset;
pub mod error;
pub mod instance;
pub mod jsonld;

pub use dataset::{Instances, Selector, ShapeDataset};
pub use error::{AccessError, CardinalityError};
pub use instance::Instance;
pub use jsonld::{to_string_pretty, JsonLdProjector};
