//! JSON-LD projection of instances
//!
//! Produces compacted-style JSON-LD objects keyed by field name. Projection
//! is shallow: object-valued fields become the referenced node's `@id`.

use crate::dataset::ShapeDataset;
use crate::error::AccessError;
use crate::instance::Instance;
use serde_json::{json, Map, Number, Value};
use solidshape_core::codec::{self, NativeValue};
use solidshape_core::vocab::{rdf, xsd};
use solidshape_core::Term;
use solidshape_shacl::{Cardinality, FieldDescriptor, NodeShapeDescriptor, ValueKind};

/// JSON-LD projector
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLdProjector {
    include_context: bool,
}

impl JsonLdProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `@context` and `@type` alongside the field values
    pub fn with_context(mut self, include_context: bool) -> Self {
        self.include_context = include_context;
        self
    }

    /// Project one instance: `@id` first, then fields in declaration order
    pub fn project(&self, instance: &Instance) -> Result<Value, AccessError> {
        let mut node = Map::new();
        if self.include_context {
            node.insert("@context".to_string(), context(instance.shape()));
        }
        self.fill(instance, &mut node)?;
        Ok(Value::Object(node))
    }

    /// Project every instance of a dataset into a `@graph` document
    pub fn project_dataset(&self, dataset: &ShapeDataset) -> Result<Value, AccessError> {
        let mut document = Map::new();
        if self.include_context {
            document.insert("@context".to_string(), context(dataset.shape()));
        }
        let nodes = dataset
            .instances()
            .map(|instance| {
                let mut node = Map::new();
                self.fill(&instance, &mut node).map(|_| Value::Object(node))
            })
            .collect::<Result<Vec<_>, _>>()?;
        document.insert("@graph".to_string(), Value::Array(nodes));
        Ok(Value::Object(document))
    }

    fn fill(&self, instance: &Instance, node: &mut Map<String, Value>) -> Result<(), AccessError> {
        let shape = instance.shape();
        node.insert("@id".to_string(), node_id(instance.subject()));
        if self.include_context {
            if let Some(class) = &shape.target_class {
                node.insert("@type".to_string(), Value::String(class.clone()));
            }
        }

        for field in &shape.fields {
            if let Some(value) = project_field(instance, field)? {
                node.insert(field.name.clone(), value);
            }
        }
        Ok(())
    }
}

/// Pretty-printed JSON text
pub fn to_string_pretty(value: &Value) -> String {
    format!("{:#}", value)
}

fn project_field(instance: &Instance, field: &FieldDescriptor) -> Result<Option<Value>, AccessError> {
    if let ValueKind::Literal { codec: None, .. } = field.value_kind {
        return raw_field(instance, field);
    }
    let value = match (&field.value_kind, field.cardinality) {
        (ValueKind::Literal { datatype, .. }, Cardinality::RequiredSingular) => {
            Some(literal_value(datatype, &instance.read_singular(field)?))
        }
        (ValueKind::Literal { datatype, .. }, Cardinality::OptionalSingular) => instance
            .read_singular_nullable(field)?
            .map(|v| literal_value(datatype, &v)),
        (ValueKind::Literal { datatype, .. }, Cardinality::Set) => {
            let values: Vec<Value> = instance
                .read_set(field)?
                .iter()
                .map(|v| literal_value(datatype, v))
                .collect();
            (!values.is_empty()).then_some(Value::Array(values))
        }
        (ValueKind::Object { .. }, Cardinality::RequiredSingular) => {
            Some(node_id(instance.read_object(field)?.subject()))
        }
        (ValueKind::Object { .. }, Cardinality::OptionalSingular) => instance
            .read_object_nullable(field)?
            .map(|i| node_id(i.subject())),
        (ValueKind::Object { .. }, Cardinality::Set) => {
            let values: Vec<Value> = instance
                .read_object_set(field)?
                .iter()
                .map(|i| node_id(i.subject()))
                .collect();
            (!values.is_empty()).then_some(Value::Array(values))
        }
    };
    Ok(value)
}

/// A datatype without a codec keeps its stored lexical forms
fn raw_field(instance: &Instance, field: &FieldDescriptor) -> Result<Option<Value>, AccessError> {
    let value = match field.cardinality {
        Cardinality::RequiredSingular => {
            let term = instance.raw_single(field)?.ok_or_else(|| instance.missing(field))?;
            Some(raw_value(&term))
        }
        Cardinality::OptionalSingular => instance.raw_single(field)?.map(|term| raw_value(&term)),
        Cardinality::Set => {
            let values: Vec<Value> = instance.raw_objects(field)?.iter().map(raw_value).collect();
            (!values.is_empty()).then_some(Value::Array(values))
        }
    };
    Ok(value)
}

fn raw_value(term: &Term) -> Value {
    match term {
        Term::Literal(literal) => match &literal.language {
            Some(language) => json!({ "@value": literal.lexical, "@language": language }),
            None => json!({ "@value": literal.lexical, "@type": literal.datatype }),
        },
        resource => node_id(resource),
    }
}

fn node_id(subject: &Term) -> Value {
    subject.to_node_id().map_or(Value::Null, Value::String)
}

/// Native JSON where one exists, else a typed value object
fn literal_value(datatype: &str, value: &NativeValue) -> Value {
    let typed = |datatype: &str| {
        let lexical = codec::encode(datatype, value)
            .map(|l| l.lexical)
            .unwrap_or_else(|_| value.to_string());
        json!({ "@value": lexical, "@type": datatype })
    };

    match value {
        NativeValue::String(s) | NativeValue::AnyUri(s) => Value::String(s.clone()),
        NativeValue::LangString { value, language } => json!({ "@value": value, "@language": language }),
        NativeValue::Boolean(b) => Value::Bool(*b),
        NativeValue::Integer(i) => Value::Number((*i).into()),
        NativeValue::Double(d) => Number::from_f64(*d).map_or_else(|| typed(datatype), Value::Number),
        NativeValue::Decimal(_) => typed(xsd::DECIMAL),
        NativeValue::DateTime(_) | NativeValue::Date(_) => typed(datatype),
    }
}

/// Term definitions for every field of `shape`
fn context(shape: &NodeShapeDescriptor) -> Value {
    let mut context = Map::new();
    for field in &shape.fields {
        let mut definition = Map::new();
        definition.insert("@id".to_string(), Value::String(field.predicate.clone()));
        match &field.value_kind {
            ValueKind::Object { .. } => {
                definition.insert("@type".to_string(), Value::String("@id".to_string()));
            }
            ValueKind::Literal { datatype, .. } if datatype != xsd::STRING && datatype != rdf::LANG_STRING => {
                definition.insert("@type".to_string(), Value::String(datatype.clone()));
            }
            ValueKind::Literal { .. } => {}
        }
        if field.cardinality == Cardinality::Set {
            definition.insert("@container".to_string(), Value::String("@set".to_string()));
        }
        context.insert(field.name.clone(), Value::Object(definition));
    }
    Value::Object(context)
}
