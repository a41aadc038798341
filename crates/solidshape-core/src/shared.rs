//! Shared, single-threaded handle to a mutable graph

use crate::model::{Term, Triple};
use crate::store::Graph;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Reference-counted graph handle held by every instance view and enumerator
///
/// Cloning the handle never copies triples. Every borrow taken through it
/// must end before the calling operation returns; nothing in this workspace
/// keeps a `Ref` or `RefMut` alive across calls.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph(Rc<RefCell<Graph>>);

impl SharedGraph {
    pub fn new(graph: Graph) -> Self {
        Self(Rc::new(RefCell::new(graph)))
    }

    pub fn read(&self) -> Ref<'_, Graph> {
        self.0.borrow()
    }

    pub fn write(&self) -> RefMut<'_, Graph> {
        self.0.borrow_mut()
    }

    /// Run a closure with exclusive access; the mutation is complete when it returns
    pub fn update<R>(&self, f: impl FnOnce(&mut Graph) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    pub fn insert(&self, triple: Triple) -> bool {
        self.write().insert(triple)
    }

    pub fn remove(&self, triple: &Triple) -> bool {
        self.write().remove(triple)
    }

    /// Cloned snapshot of a pattern match
    pub fn find_triples(&self, subject: Option<&Term>, predicate: Option<&str>, object: Option<&Term>) -> Vec<Triple> {
        self.read()
            .find_triples(subject, predicate, object)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Do both handles point at the same graph?
    pub fn ptr_eq(&self, other: &SharedGraph) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Take the graph back if this is the last handle
    pub fn try_unwrap(self) -> Result<Graph, SharedGraph> {
        Rc::try_unwrap(self.0)
            .map(RefCell::into_inner)
            .map_err(SharedGraph)
    }
}

impl From<Graph> for SharedGraph {
    fn from(graph: Graph) -> Self {
        Self::new(graph)
    }
}
