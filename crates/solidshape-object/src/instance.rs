//! Shape-bound instance views
//!
//! An [`Instance`] is a subject term paired with a compiled node shape and a
//! handle to the graph it lives in. It holds no field state of its own: every
//! read matches triples at call time and every write mutates the graph
//! directly, so several views of the same subject always agree.

use crate::error::{AccessError, CardinalityError};
use solidshape_core::codec::{self, FromNative, NativeValue};
use solidshape_core::{CodecError, SharedGraph, Term};
use solidshape_shacl::{Cardinality, ClassModel, FieldDescriptor, NodeShapeDescriptor, ShapeId, ValueKind};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

/// A subject viewed through a node shape
///
/// Equality, ordering and hashing use `(subject, shape)` only.
#[derive(Clone)]
pub struct Instance {
    subject: Term,
    shape: ShapeId,
    model: Arc<ClassModel>,
    graph: SharedGraph,
}

impl Instance {
    /// Bind `subject` to `shape`. The subject must be an IRI or blank node.
    pub fn new(subject: Term, shape: ShapeId, model: Arc<ClassModel>, graph: SharedGraph) -> Result<Self, AccessError> {
        if model.get(shape).is_none() {
            return Err(AccessError::UnknownShape { shape });
        }
        if !subject.is_resource() {
            return Err(CodecError::TypeMismatch {
                expected: "resource".to_string(),
                found: subject.to_string(),
            }
            .into());
        }
        Ok(Self::bind(subject, shape, model, graph))
    }

    /// Caller guarantees `shape` is in `model` and `subject` is a resource
    pub(crate) fn bind(subject: Term, shape: ShapeId, model: Arc<ClassModel>, graph: SharedGraph) -> Self {
        Self {
            subject,
            shape,
            model,
            graph,
        }
    }

    pub fn subject(&self) -> &Term {
        &self.subject
    }

    pub fn shape_id(&self) -> ShapeId {
        self.shape
    }

    pub fn shape(&self) -> &NodeShapeDescriptor {
        &self.model[self.shape]
    }

    pub fn model(&self) -> &Arc<ClassModel> {
        &self.model
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    /// Field descriptor by derived name
    pub fn field(&self, name: &str) -> Result<&FieldDescriptor, AccessError> {
        let shape = self.shape();
        shape.field(name).ok_or_else(|| AccessError::UnknownField {
            shape: shape.id.clone(),
            name: name.to_string(),
        })
    }

    /// View the same subject through another shape
    pub fn cast(&self, shape: ShapeId) -> Result<Instance, AccessError> {
        Instance::new(self.subject.clone(), shape, self.model.clone(), self.graph.clone())
    }

    // ---- literal fields ----

    /// Exactly one value, decoded
    pub fn read_singular(&self, field: &FieldDescriptor) -> Result<NativeValue, AccessError> {
        self.read_singular_nullable(field)?.ok_or_else(|| self.missing(field))
    }

    /// Zero or one value, decoded
    pub fn read_singular_nullable(&self, field: &FieldDescriptor) -> Result<Option<NativeValue>, AccessError> {
        let datatype = self.literal_datatype(field)?;
        self.single(field)?.map(|term| decode_term(datatype, &term)).transpose()
    }

    /// Replace every value of `field` with `value`
    pub fn write_singular(&self, field: &FieldDescriptor, value: impl Into<NativeValue>) -> Result<(), AccessError> {
        self.write_singular_nullable(field, Some(value.into()))
    }

    /// Replace every value of `field` with `value`, or clear it on `None`
    ///
    /// Clearing is only allowed on optional fields.
    pub fn write_singular_nullable(&self, field: &FieldDescriptor, value: Option<NativeValue>) -> Result<(), AccessError> {
        let datatype = self.literal_datatype(field)?;
        let object = value
            .map(|v| codec::encode(datatype, &v).map(Term::Literal))
            .transpose()?;
        self.replace(field, object.into_iter().collect())
    }

    /// Snapshot of every decoded value; values that decode equal collapse
    pub fn read_set(&self, field: &FieldDescriptor) -> Result<BTreeSet<NativeValue>, AccessError> {
        let datatype = self.literal_datatype(field)?;
        self.objects(field)
            .iter()
            .map(|term| decode_term(datatype, term))
            .collect()
    }

    /// Replace the whole collection of a set-valued field
    pub fn write_set<I>(&self, field: &FieldDescriptor, values: I) -> Result<(), AccessError>
    where
        I: IntoIterator,
        I::Item: Into<NativeValue>,
    {
        let datatype = self.literal_datatype(field)?;
        let objects = values
            .into_iter()
            .map(|v| codec::encode(datatype, &v.into()).map(Term::Literal))
            .collect::<Result<Vec<_>, _>>()?;
        self.replace_set(field, objects)
    }

    pub fn read_singular_as<T: FromNative>(&self, field: &FieldDescriptor) -> Result<T, AccessError> {
        Ok(T::from_native(self.read_singular(field)?)?)
    }

    pub fn read_singular_nullable_as<T: FromNative>(&self, field: &FieldDescriptor) -> Result<Option<T>, AccessError> {
        self.read_singular_nullable(field)?
            .map(|v| T::from_native(v).map_err(AccessError::from))
            .transpose()
    }

    pub fn read_set_as<T: FromNative + Ord>(&self, field: &FieldDescriptor) -> Result<BTreeSet<T>, AccessError> {
        self.read_set(field)?
            .into_iter()
            .map(|v| T::from_native(v).map_err(AccessError::from))
            .collect()
    }

    // ---- object fields ----

    /// The single referenced instance, bound to the field's target shape
    pub fn read_object(&self, field: &FieldDescriptor) -> Result<Instance, AccessError> {
        self.read_object_nullable(field)?.ok_or_else(|| self.missing(field))
    }

    pub fn read_object_nullable(&self, field: &FieldDescriptor) -> Result<Option<Instance>, AccessError> {
        let shape = self.object_shape(field)?;
        self.single(field)?.map(|term| self.nested(shape, term)).transpose()
    }

    pub fn write_object(&self, field: &FieldDescriptor, value: &Instance) -> Result<(), AccessError> {
        self.write_object_nullable(field, Some(value))
    }

    pub fn write_object_nullable(&self, field: &FieldDescriptor, value: Option<&Instance>) -> Result<(), AccessError> {
        self.object_shape(field)?;
        self.replace(field, value.map(|i| i.subject.clone()).into_iter().collect())
    }

    pub fn read_object_set(&self, field: &FieldDescriptor) -> Result<BTreeSet<Instance>, AccessError> {
        let shape = self.object_shape(field)?;
        self.objects(field)
            .into_iter()
            .map(|term| self.nested(shape, term))
            .collect()
    }

    pub fn write_object_set<'a, I>(&self, field: &FieldDescriptor, values: I) -> Result<(), AccessError>
    where
        I: IntoIterator<Item = &'a Instance>,
    {
        self.object_shape(field)?;
        let objects = values.into_iter().map(|i| i.subject.clone()).collect();
        self.replace_set(field, objects)
    }

    /// Stored objects of a literal field, undecoded
    pub(crate) fn raw_objects(&self, field: &FieldDescriptor) -> Result<BTreeSet<Term>, AccessError> {
        self.literal_datatype(field)?;
        Ok(self.objects(field).into_iter().collect())
    }

    pub(crate) fn raw_single(&self, field: &FieldDescriptor) -> Result<Option<Term>, AccessError> {
        self.literal_datatype(field)?;
        Ok(self.single(field)?)
    }

    // ---- internals ----

    /// `field` must be one of this instance's own shape fields
    fn own<'f>(&self, field: &'f FieldDescriptor) -> Result<&'f FieldDescriptor, AccessError> {
        let shape = self.shape();
        if shape.fields.iter().any(|f| f == field) {
            Ok(field)
        } else {
            Err(AccessError::UnknownField {
                shape: shape.id.clone(),
                name: field.name.clone(),
            })
        }
    }

    fn literal_datatype<'f>(&self, field: &'f FieldDescriptor) -> Result<&'f str, AccessError> {
        match &self.own(field)?.value_kind {
            ValueKind::Literal { datatype, .. } => Ok(datatype),
            ValueKind::Object { .. } => Err(AccessError::WrongValueKind {
                field: field.name.clone(),
                expected: "literal",
            }),
        }
    }

    fn object_shape(&self, field: &FieldDescriptor) -> Result<ShapeId, AccessError> {
        match self.own(field)?.value_kind {
            ValueKind::Object { shape } => Ok(shape),
            ValueKind::Literal { .. } => Err(AccessError::WrongValueKind {
                field: field.name.clone(),
                expected: "object",
            }),
        }
    }

    fn wrong_cardinality(field: &FieldDescriptor) -> AccessError {
        AccessError::WrongCardinality {
            field: field.name.clone(),
            cardinality: field.cardinality,
        }
    }

    fn objects(&self, field: &FieldDescriptor) -> Vec<Term> {
        self.graph.read().objects(&self.subject, &field.predicate)
    }

    fn single(&self, field: &FieldDescriptor) -> Result<Option<Term>, CardinalityError> {
        let mut objects = self.objects(field);
        match objects.len() {
            0 | 1 => Ok(objects.pop()),
            count => Err(CardinalityError::Multiple {
                subject: self.subject.clone(),
                predicate: field.predicate.clone(),
                count,
            }),
        }
    }

    pub(crate) fn missing(&self, field: &FieldDescriptor) -> AccessError {
        CardinalityError::Missing {
            subject: self.subject.clone(),
            predicate: field.predicate.clone(),
        }
        .into()
    }

    fn nested(&self, shape: ShapeId, term: Term) -> Result<Instance, AccessError> {
        if self.model.get(shape).is_none() {
            return Err(AccessError::UnknownShape { shape });
        }
        if !term.is_resource() {
            return Err(CodecError::TypeMismatch {
                expected: "resource".to_string(),
                found: term.to_string(),
            }
            .into());
        }
        Ok(Instance::bind(term, shape, self.model.clone(), self.graph.clone()))
    }

    /// Singular write: one object, or none to clear an optional field
    fn replace(&self, field: &FieldDescriptor, objects: Vec<Term>) -> Result<(), AccessError> {
        match (field.cardinality, objects.len()) {
            (Cardinality::Set, _) => Err(Self::wrong_cardinality(field)),
            (Cardinality::RequiredSingular, 0) => Err(Self::wrong_cardinality(field)),
            _ => {
                self.commit(field, objects);
                Ok(())
            }
        }
    }

    /// Set write, bounded by the field's `sh:maxCount`
    fn replace_set(&self, field: &FieldDescriptor, objects: Vec<Term>) -> Result<(), AccessError> {
        if field.cardinality.is_singular() {
            return Err(Self::wrong_cardinality(field));
        }
        if let Some(max) = field.max_count {
            let count = objects.iter().collect::<BTreeSet<_>>().len();
            if count as u64 > max {
                return Err(CardinalityError::TooMany {
                    subject: self.subject.clone(),
                    predicate: field.predicate.clone(),
                    count,
                    max,
                }
                .into());
            }
        }
        self.commit(field, objects);
        Ok(())
    }

    /// Remove every `(subject, predicate, *)` and insert `objects`, under one borrow
    fn commit(&self, field: &FieldDescriptor, objects: Vec<Term>) {
        let (removed, inserted) = self.graph.update(|graph| {
            let removed = graph.remove_matching(Some(&self.subject), Some(&field.predicate), None);
            let inserted = objects
                .into_iter()
                .filter(|o| graph.add(self.subject.clone(), field.predicate.as_str(), o.clone()))
                .count();
            (removed, inserted)
        });
        debug!(subject = %self.subject, field = %field.name, removed, inserted, "wrote field");
    }
}

fn decode_term(datatype: &str, term: &Term) -> Result<NativeValue, AccessError> {
    let literal = term.as_literal().ok_or_else(|| CodecError::TypeMismatch {
        expected: datatype.to_string(),
        found: term.to_string(),
    })?;
    Ok(codec::decode_as(datatype, literal)?)
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("subject", &self.subject)
            .field("shape", &self.shape().id)
            .finish()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject && self.shape == other.shape
    }
}

impl Eq for Instance {}

impl PartialOrd for Instance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instance {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.subject, self.shape).cmp(&(&other.subject, other.shape))
    }
}

impl Hash for Instance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subject.hash(state);
        self.shape.hash(state);
    }
}
