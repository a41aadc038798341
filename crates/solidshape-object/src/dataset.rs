//! Shape datasets: enumerate and create the instances of one node shape

use crate::error::AccessError;
use crate::instance::Instance;
use solidshape_core::vocab::rdf;
use solidshape_core::{CodecError, Seq, SharedGraph, Term, Triple};
use solidshape_shacl::{ClassModel, NodeShapeDescriptor, ShapeId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Which subjects belong to a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Subjects of `(?, rdf:type, class)`
    TargetClass(String),
    /// Subjects with at least one value for the predicate
    SubjectsOf(String),
}

/// All subjects of a graph that match a shape's selector
#[derive(Debug, Clone)]
pub struct ShapeDataset {
    graph: SharedGraph,
    model: Arc<ClassModel>,
    shape: ShapeId,
    selector: Option<Selector>,
}

impl ShapeDataset {
    /// Dataset selecting by the shape's target class, if it has one
    pub fn new(graph: SharedGraph, model: Arc<ClassModel>, shape: ShapeId) -> Result<Self, AccessError> {
        let descriptor = model.get(shape).ok_or(AccessError::UnknownShape { shape })?;
        let selector = descriptor.target_class.clone().map(Selector::TargetClass);
        Ok(Self {
            graph,
            model,
            shape,
            selector,
        })
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn selector(&self) -> Option<&Selector> {
        self.selector.as_ref()
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

    /// Lazy iterator over matching subjects, one instance per distinct subject
    pub fn instances(&self) -> Instances {
        let pattern = match &self.selector {
            Some(Selector::TargetClass(class)) => Some(Pattern::Typed(Term::iri(class.as_str()))),
            Some(Selector::SubjectsOf(predicate)) => Some(Pattern::Subject(predicate.clone())),
            None => None,
        };
        Instances {
            graph: self.graph.clone(),
            model: self.model.clone(),
            shape: self.shape,
            pattern,
            cursor: None,
            seen: HashSet::new(),
        }
    }

    /// Number of distinct matching subjects right now
    pub fn len(&self) -> usize {
        self.instances().count()
    }

    pub fn is_empty(&self) -> bool {
        self.instances().next().is_none()
    }

    /// The instance for `subject` if it currently matches the selector
    pub fn get(&self, subject: &Term) -> Option<Instance> {
        let selector = self.selector.as_ref()?;
        if !subject.is_resource() {
            return None;
        }
        let graph = self.graph.read();
        let matches = match selector {
            Selector::TargetClass(class) => {
                graph.contains(&Triple::new(subject.clone(), rdf::TYPE, Term::iri(class.as_str())))
            }
            Selector::SubjectsOf(predicate) => !graph.find_triples(Some(subject), Some(predicate.as_str()), None).is_empty(),
        };
        drop(graph);
        matches.then(|| self.bind(subject.clone()))
    }

    /// Bind `subject` to this dataset's shape, asserting its `rdf:type` marker
    ///
    /// Under [`Selector::SubjectsOf`] there is no marker triple; the subject
    /// joins the dataset once a value for the predicate is written.
    pub fn create(&self, subject: Term) -> Result<Instance, AccessError> {
        if !subject.is_resource() {
            return Err(CodecError::TypeMismatch {
                expected: "resource".to_string(),
                found: subject.to_string(),
            }
            .into());
        }
        if let Some(Selector::TargetClass(class)) = &self.selector {
            self.graph
                .insert(Triple::new(subject.clone(), rdf::TYPE, Term::iri(class.as_str())));
            debug!(subject = %subject, class = %class, "created instance");
        }
        Ok(self.bind(subject))
    }

    /// [`create`](Self::create) with a fresh blank node subject
    pub fn create_blank(&self) -> Result<Instance, AccessError> {
        let subject = self.graph.read().fresh_blank_node();
        self.create(subject)
    }

    fn bind(&self, subject: Term) -> Instance {
        Instance::bind(subject, self.shape, self.model.clone(), self.graph.clone())
    }
}

impl<'a> IntoIterator for &'a ShapeDataset {
    type Item = Instance;
    type IntoIter = Instances;

    fn into_iter(self) -> Instances {
        self.instances()
    }
}

#[derive(Debug, Clone)]
enum Pattern {
    Typed(Term),
    Subject(String),
}

/// Lazy instance enumerator
///
/// Holds a cursor into the graph's insertion sequence and borrows the graph
/// only inside [`Iterator::next`], so triples added or removed between calls
/// are seen by later calls.
#[derive(Debug)]
pub struct Instances {
    graph: SharedGraph,
    model: Arc<ClassModel>,
    shape: ShapeId,
    pattern: Option<Pattern>,
    cursor: Option<Seq>,
    seen: HashSet<Term>,
}

impl Iterator for Instances {
    type Item = Instance;

    fn next(&mut self) -> Option<Instance> {
        loop {
            let (seq, subject) = {
                let graph = self.graph.read();
                let found = match self.pattern.as_ref()? {
                    Pattern::Typed(class) => graph.next_match_after(self.cursor, None, Some(rdf::TYPE), Some(class)),
                    Pattern::Subject(predicate) => graph.next_match_after(self.cursor, None, Some(predicate.as_str()), None),
                };
                found.map(|(seq, t)| (seq, t.subject.clone()))?
            };
            self.cursor = Some(seq);
            // literal subjects cannot be bound to a shape
            if subject.is_resource() && self.seen.insert(subject.clone()) {
                return Some(Instance::bind(subject, self.shape, self.model.clone(), self.graph.clone()));
            }
        }
    }
}
