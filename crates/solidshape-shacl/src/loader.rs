//! Shape graph loader
//!
//! Reads the recognized SHACL subset out of a [`Graph`] into raw shapes.
//! Loading is two-pass: first every node shape id is collected, then
//! property shapes are read and their `sh:node` / `sh:class` references are
//! resolved against that id set, so forward and self references work.

use crate::ShapeError;
use solidshape_core::codec::{self, NativeValue};
use solidshape_core::vocab::{rdf, rdfs, sh, xsd};
use solidshape_core::{Graph, Term};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Loaded shapes, one entry per node shape in declaration order
#[derive(Debug, Clone, Default)]
pub struct ShapesGraph {
    pub entries: Vec<ShapeEntry>,
}

impl ShapesGraph {
    pub fn shape_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Successfully loaded shapes
    pub fn shapes(&self) -> impl Iterator<Item = &NodeShape> {
        self.entries.iter().filter_map(|e| e.shape.as_ref().ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = &ShapeError> {
        self.entries.iter().filter_map(|e| e.shape.as_ref().err())
    }
}

/// Load outcome for one node shape
#[derive(Debug, Clone)]
pub struct ShapeEntry {
    pub id: String,
    pub shape: Result<NodeShape, ShapeError>,
}

/// Node Shape
#[derive(Debug, Clone, PartialEq)]
pub struct NodeShape {
    pub id: String,
    pub target_class: Option<String>,
    pub label: Option<String>,
    /// Property shapes, ordered by `sh:order` then declaration order
    pub properties: Vec<PropertyShape>,
}

/// Property Shape
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyShape {
    /// The property shape node, usually a blank node
    pub node: Term,
    pub path: String,
    pub value: ValueRef,
    pub min_count: Option<u64>,
    /// `None` when absent; an explicit `sh:maxCount 0` is read as unbounded too
    pub max_count: Option<u64>,
    pub name: Option<String>,
    pub order: Option<f64>,
}

/// Value constraint of a property shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueRef {
    /// `sh:datatype`
    Datatype(String),
    /// Shape IRI resolved from `sh:node` or `sh:class`
    Shape(String),
}

/// SHACL loader trait
pub trait ShapeLoader {
    fn load(&self, graph: &Graph) -> ShapesGraph;
}

/// Default SHACL loader
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultShapeLoader;

impl ShapeLoader for DefaultShapeLoader {
    fn load(&self, graph: &Graph) -> ShapesGraph {
        // Pass 1: shape ids and their target classes
        let mut ids: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for triple in graph.find_triples(None, Some(rdf::TYPE), Some(&Term::iri(sh::NODE_SHAPE))) {
            if let Some(id) = triple.subject.to_node_id() {
                if seen.insert(id.clone()) {
                    ids.push(id);
                }
            }
        }

        let mut targets: HashMap<String, Option<String>> = HashMap::new();
        let mut by_class: HashMap<String, String> = HashMap::new();
        for id in &ids {
            let target = target_class(graph, id);
            if let Some(class) = &target {
                by_class.entry(class.clone()).or_insert_with(|| id.clone());
            }
            targets.insert(id.clone(), target);
        }

        let known = Known { ids: &seen, by_class: &by_class };

        // Pass 2: property shapes with resolved references
        let entries = ids
            .iter()
            .map(|id| {
                let target_class = targets.get(id).cloned().flatten();
                let shape = load_node_shape(graph, id, target_class, &known);
                if let Err(err) = &shape {
                    debug!(shape = %id, error = %err, "shape failed to load");
                }
                ShapeEntry { id: id.clone(), shape }
            })
            .collect();

        ShapesGraph { entries }
    }
}

struct Known<'a> {
    ids: &'a HashSet<String>,
    by_class: &'a HashMap<String, String>,
}

fn node_term(id: &str) -> Term {
    match id.strip_prefix("_:") {
        Some(blank) => Term::blank(blank),
        None => Term::iri(id),
    }
}

/// Explicit `sh:targetClass`, or the shape itself when it is also an `rdfs:Class`
fn target_class(graph: &Graph, id: &str) -> Option<String> {
    let subject = node_term(id);
    let explicit: Vec<String> = graph
        .objects(&subject, sh::TARGET_CLASS)
        .into_iter()
        .filter_map(|t| t.as_iri().map(str::to_string))
        .collect();

    if explicit.len() > 1 {
        debug!(shape = %id, count = explicit.len(), "multiple target classes, using the first");
    }
    if let Some(first) = explicit.into_iter().next() {
        return Some(first);
    }

    let is_class = graph.contains(&solidshape_core::Triple::new(
        subject,
        rdf::TYPE,
        Term::iri(rdfs::CLASS),
    ));
    is_class.then(|| id.to_string())
}

fn load_node_shape(graph: &Graph, id: &str, target_class: Option<String>, known: &Known<'_>) -> Result<NodeShape, ShapeError> {
    let subject = node_term(id);

    let label = first_literal(graph, &subject, rdfs::LABEL);

    let mut properties = Vec::new();
    for node in graph.objects(&subject, sh::PROPERTY) {
        properties.push(load_property_shape(graph, id, node, known)?);
    }

    // Stable: unordered properties keep declaration order after ordered ones
    properties.sort_by(|a, b| match (a.order, b.order) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    Ok(NodeShape {
        id: id.to_string(),
        target_class,
        label,
        properties,
    })
}

fn load_property_shape(graph: &Graph, shape: &str, node: Term, known: &Known<'_>) -> Result<PropertyShape, ShapeError> {
    let property = node.to_string();

    let path = graph
        .objects(&node, sh::PATH)
        .into_iter()
        .find_map(|t| t.as_iri().map(str::to_string))
        .ok_or_else(|| ShapeError::MissingPath {
            shape: shape.to_string(),
            property: property.clone(),
        })?;

    let datatype = first_iri(graph, &node, sh::DATATYPE);
    let node_ref = first_iri(graph, &node, sh::NODE);
    let class_ref = first_iri(graph, &node, sh::CLASS);

    let value = match (datatype, node_ref, class_ref) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            return Err(ShapeError::AmbiguousMapping {
                shape: shape.to_string(),
                property: path,
            })
        }
        (Some(datatype), None, None) => ValueRef::Datatype(datatype),
        (None, Some(target), _) => {
            if !known.ids.contains(&target) {
                return Err(ShapeError::UnresolvedShapeReference {
                    shape: shape.to_string(),
                    property: path,
                    reference: target,
                });
            }
            ValueRef::Shape(target)
        }
        (None, None, Some(class)) => match known.by_class.get(&class) {
            Some(target) => ValueRef::Shape(target.clone()),
            None => {
                return Err(ShapeError::UnresolvedShapeReference {
                    shape: shape.to_string(),
                    property: path,
                    reference: class,
                })
            }
        },
        (None, None, None) => {
            debug!(shape = %shape, path = %path, "no datatype or reference, defaulting to xsd:string");
            ValueRef::Datatype(xsd::STRING.to_string())
        }
    };

    let min_count = count(graph, shape, &path, &node, sh::MIN_COUNT)?;
    let max_count = count(graph, shape, &path, &node, sh::MAX_COUNT)?.filter(|max| *max > 0);

    if let (Some(min), Some(max)) = (min_count, max_count) {
        if min > max {
            return Err(ShapeError::InvalidCardinality {
                shape: shape.to_string(),
                property: path,
                reason: format!("minCount {} exceeds maxCount {}", min, max),
            });
        }
    }

    let name = first_literal(graph, &node, sh::NAME);
    let order = graph.objects(&node, sh::ORDER).into_iter().find_map(|t| {
        match codec::decode(t.as_literal()?).ok()? {
            NativeValue::Integer(i) => Some(i as f64),
            NativeValue::Double(d) => Some(d),
            NativeValue::Decimal(d) => d.parse().ok(),
            _ => None,
        }
    });

    Ok(PropertyShape {
        node,
        path,
        value,
        min_count,
        max_count,
        name,
        order,
    })
}

fn first_iri(graph: &Graph, subject: &Term, predicate: &str) -> Option<String> {
    graph
        .objects(subject, predicate)
        .into_iter()
        .find_map(|t| t.as_iri().map(str::to_string))
}

fn first_literal(graph: &Graph, subject: &Term, predicate: &str) -> Option<String> {
    graph
        .objects(subject, predicate)
        .into_iter()
        .find_map(|t| t.as_literal().map(|l| l.lexical.clone()))
}

/// Read a non-negative integer count; a malformed value is a cardinality error
fn count(graph: &Graph, shape: &str, path: &str, node: &Term, predicate: &str) -> Result<Option<u64>, ShapeError> {
    let Some(term) = graph.objects(node, predicate).into_iter().next() else {
        return Ok(None);
    };

    let invalid = |reason: String| ShapeError::InvalidCardinality {
        shape: shape.to_string(),
        property: path.to_string(),
        reason,
    };

    let literal = term
        .as_literal()
        .ok_or_else(|| invalid(format!("{} is not a literal", term)))?;

    // Plain lexical integers are accepted whatever their datatype claims
    let value = match codec::decode(literal) {
        Ok(NativeValue::Integer(i)) => i,
        _ => literal
            .lexical
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(format!("{} is not an integer", term)))?,
    };

    u64::try_from(value)
        .map(Some)
        .map_err(|_| invalid(format!("negative count {}", value)))
}
