//! Compiled class model: the immutable output of the shape compiler

use crate::ShapeError;
use serde::{Deserialize, Serialize};
use solidshape_core::CodecId;
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

/// Index of a node shape inside a [`ClassModel`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub usize);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cardinality class derived from `sh:minCount` / `sh:maxCount`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// min = 1, max = 1
    RequiredSingular,
    /// min = 0, max = 1
    OptionalSingular,
    /// max > 1 or unbounded
    Set,
}

impl Cardinality {
    /// Cardinality policy. `max = None` means unbounded.
    pub fn from_bounds(min: u64, max: Option<u64>) -> Self {
        match max {
            Some(1) if min >= 1 => Cardinality::RequiredSingular,
            Some(1) => Cardinality::OptionalSingular,
            _ => Cardinality::Set,
        }
    }

    pub fn is_singular(self) -> bool {
        !matches!(self, Cardinality::Set)
    }
}

/// What a field's objects are: decoded literals or nested instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueKind {
    Literal {
        datatype: String,
        /// `None` when the registry has no codec for `datatype`
        codec: Option<CodecId>,
    },
    Object {
        shape: ShapeId,
    },
}

/// One constrained property of a node shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub predicate: String,
    pub cardinality: Cardinality,
    pub min_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u64>,
    pub value_kind: ValueKind,
}

impl FieldDescriptor {
    pub fn is_object(&self) -> bool {
        matches!(self.value_kind, ValueKind::Object { .. })
    }

    /// Referenced shape for object-valued fields
    pub fn shape_ref(&self) -> Option<ShapeId> {
        match self.value_kind {
            ValueKind::Object { shape } => Some(shape),
            ValueKind::Literal { .. } => None,
        }
    }

    /// Datatype IRI for literal-valued fields
    pub fn datatype(&self) -> Option<&str> {
        match &self.value_kind {
            ValueKind::Literal { datatype, .. } => Some(datatype),
            ValueKind::Object { .. } => None,
        }
    }
}

/// Compiled node shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeShapeDescriptor {
    /// Shape IRI
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl NodeShapeDescriptor {
    /// Look a field up by its derived name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look a field up by predicate IRI
    pub fn field_for_predicate(&self, predicate: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.predicate == predicate)
    }
}

/// Registry of compiled shapes, addressed by [`ShapeId`] or shape IRI
///
/// Shapes refer to each other only through ids, so self- and mutually
/// referential shapes are plain data here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NodeShapeDescriptor>", into = "Vec<NodeShapeDescriptor>")]
pub struct ClassModel {
    shapes: Vec<NodeShapeDescriptor>,
    index: HashMap<String, ShapeId>,
}

impl ClassModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shape, returning its id. Re-registering an IRI replaces it in place.
    pub(crate) fn push(&mut self, shape: NodeShapeDescriptor) -> ShapeId {
        if let Some(&id) = self.index.get(&shape.id) {
            self.shapes[id.0] = shape;
            return id;
        }
        let id = ShapeId(self.shapes.len());
        self.index.insert(shape.id.clone(), id);
        self.shapes.push(shape);
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&NodeShapeDescriptor> {
        self.shapes.get(id.0)
    }

    pub fn shape_id(&self, iri: &str) -> Option<ShapeId> {
        self.index.get(iri).copied()
    }

    pub fn by_iri(&self, iri: &str) -> Option<&NodeShapeDescriptor> {
        self.shape_id(iri).and_then(|id| self.get(id))
    }

    /// Shapes in registration order
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &NodeShapeDescriptor)> {
        self.shapes.iter().enumerate().map(|(i, s)| (ShapeId(i), s))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Pretty JSON export for generated or reflective accessor code
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Panics on an id this model did not hand out
impl Index<ShapeId> for ClassModel {
    type Output = NodeShapeDescriptor;

    fn index(&self, id: ShapeId) -> &NodeShapeDescriptor {
        &self.shapes[id.0]
    }
}

/// Rejects object fields that point outside the shape list
impl TryFrom<Vec<NodeShapeDescriptor>> for ClassModel {
    type Error = ShapeError;

    fn try_from(shapes: Vec<NodeShapeDescriptor>) -> Result<Self, ShapeError> {
        let mut model = ClassModel::new();
        for shape in shapes {
            model.push(shape);
        }
        for shape in &model.shapes {
            for field in &shape.fields {
                if let Some(target) = field.shape_ref().filter(|id| model.get(*id).is_none()) {
                    return Err(ShapeError::UnresolvedShapeReference {
                        shape: shape.id.clone(),
                        property: field.predicate.clone(),
                        reference: target.to_string(),
                    });
                }
            }
        }
        Ok(model)
    }
}

impl From<ClassModel> for Vec<NodeShapeDescriptor> {
    fn from(model: ClassModel) -> Self {
        model.shapes
    }
}
