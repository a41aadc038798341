//! Graph storage and manipulation

use crate::model::{Term, Triple};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;
use tracing::trace;

/// Insertion sequence number of a stored triple
pub type Seq = u64;

/// In-memory triple set with subject/predicate/object indexing
///
/// Triples keep their insertion sequence number for their whole life, so
/// pattern matches come back in insertion order and cursors handed out by
/// [`Graph::next_match_after`] stay valid across unrelated mutations.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Stored triples keyed by insertion sequence
    triples: BTreeMap<Seq, Triple>,
    /// Reverse lookup used for set semantics and exact removal
    positions: HashMap<Triple, Seq>,
    /// Subject index: subject -> sequence numbers
    subject_index: HashMap<Term, BTreeSet<Seq>>,
    /// Predicate index: predicate -> sequence numbers
    predicate_index: HashMap<String, BTreeSet<Seq>>,
    /// Object index: object -> sequence numbers
    object_index: HashMap<Term, BTreeSet<Seq>>,
    next_seq: Seq,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a batch of triples
    pub fn from_triples<I: IntoIterator<Item = Triple>>(triples: I) -> Self {
        let mut graph = Self::new();
        graph.extend(triples);
        graph
    }

    /// Insert a triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.positions.contains_key(&triple) {
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        // Update indices
        self.subject_index.entry(triple.subject.clone()).or_default().insert(seq);
        self.predicate_index.entry(triple.predicate.clone()).or_default().insert(seq);
        self.object_index.entry(triple.object.clone()).or_default().insert(seq);

        trace!(seq, %triple, "insert");
        self.positions.insert(triple.clone(), seq);
        self.triples.insert(seq, triple);
        true
    }

    /// Convenience wrapper around [`Graph::insert`]
    pub fn add<P: Into<String>>(&mut self, subject: Term, predicate: P, object: Term) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    /// Insert multiple triples
    pub fn extend<I: IntoIterator<Item = Triple>>(&mut self, triples: I) {
        for triple in triples {
            self.insert(triple);
        }
    }

    /// Remove a triple. Returns `false` if it was not present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        let Some(seq) = self.positions.remove(triple) else {
            return false;
        };
        self.triples.remove(&seq);

        unindex(&mut self.subject_index, &triple.subject, seq);
        unindex(&mut self.predicate_index, triple.predicate.as_str(), seq);
        unindex(&mut self.object_index, &triple.object, seq);

        trace!(seq, %triple, "remove");
        true
    }

    /// Remove every triple matching the pattern, returning how many were removed
    pub fn remove_matching(&mut self, subject: Option<&Term>, predicate: Option<&str>, object: Option<&Term>) -> usize {
        let doomed: Vec<Triple> = self
            .find_triples(subject, predicate, object)
            .into_iter()
            .cloned()
            .collect();

        for triple in &doomed {
            self.remove(triple);
        }
        doomed.len()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.positions.contains_key(triple)
    }

    /// Find triples matching a pattern, in insertion order
    pub fn find_triples(&self, subject: Option<&Term>, predicate: Option<&str>, object: Option<&Term>) -> Vec<&Triple> {
        match self.candidates(subject, predicate, object) {
            Some(seqs) => seqs
                .iter()
                .filter_map(|seq| self.triples.get(seq))
                .filter(|t| t.matches(subject, predicate, object))
                .collect(),
            None => self
                .triples
                .values()
                .filter(|t| t.matches(subject, predicate, object))
                .collect(),
        }
    }

    /// Objects of all `(subject, predicate, *)` triples
    pub fn objects(&self, subject: &Term, predicate: &str) -> Vec<Term> {
        self.find_triples(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|t| t.object.clone())
            .collect()
    }

    /// First triple with a sequence number strictly greater than `after` that matches the pattern
    ///
    /// This is the cursor primitive behind lazy enumeration: the caller keeps
    /// only the returned [`Seq`] between calls, never a borrow of the graph.
    pub fn next_match_after(
        &self,
        after: Option<Seq>,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Option<(Seq, &Triple)> {
        let lower = after.map_or(Bound::Unbounded, Bound::Excluded);

        match self.candidates(subject, predicate, object) {
            Some(seqs) => seqs
                .range((lower, Bound::Unbounded))
                .filter_map(|seq| self.triples.get(seq).map(|t| (*seq, t)))
                .find(|(_, t)| t.matches(subject, predicate, object)),
            None => self
                .triples
                .range((lower, Bound::Unbounded))
                .map(|(seq, t)| (*seq, t))
                .find(|(_, t)| t.matches(subject, predicate, object)),
        }
    }

    /// Mint a blank node that does not occur in this graph
    pub fn fresh_blank_node(&self) -> Term {
        loop {
            let candidate = Term::BlankNode(format!("b{}", uuid::Uuid::new_v4().simple()));
            if !self.subject_index.contains_key(&candidate) && !self.object_index.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// All triples in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.values()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Clear the graph. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.triples.clear();
        self.positions.clear();
        self.subject_index.clear();
        self.predicate_index.clear();
        self.object_index.clear();
    }

    /// Pick the most selective index for the bound pattern components
    fn candidates(&self, subject: Option<&Term>, predicate: Option<&str>, object: Option<&Term>) -> Option<&BTreeSet<Seq>> {
        static EMPTY: BTreeSet<Seq> = BTreeSet::new();

        let bound = [
            subject.map(|s| self.subject_index.get(s)),
            predicate.map(|p| self.predicate_index.get(p)),
            object.map(|o| self.object_index.get(o)),
        ];

        bound
            .into_iter()
            .flatten()
            .map(|set| set.unwrap_or(&EMPTY))
            .min_by_key(|set| set.len())
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self::from_triples(iter)
    }
}

fn unindex<K, Q>(index: &mut HashMap<K, BTreeSet<Seq>>, key: &Q, seq: Seq)
where
    K: std::borrow::Borrow<Q> + std::hash::Hash + Eq,
    Q: std::hash::Hash + Eq + ?Sized,
{
    if let Some(seqs) = index.get_mut(key) {
        seqs.remove(&seq);
        if seqs.is_empty() {
            index.remove(key);
        }
    }
}
