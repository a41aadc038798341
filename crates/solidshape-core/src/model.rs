//! RDF term and triple data models

use crate::vocab::{rdf, xsd};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal value: lexical form, datatype IRI and optional language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Literal {
    /// Typed literal
    pub fn typed<L: Into<String>, D: Into<String>>(lexical: L, datatype: D) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// Plain `xsd:string` literal
    pub fn string<L: Into<String>>(lexical: L) -> Self {
        Self::typed(lexical, xsd::STRING)
    }

    /// Language-tagged `rdf:langString` literal
    pub fn lang_string<L: Into<String>, T: Into<String>>(lexical: L, language: T) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: rdf::LANG_STRING.to_string(),
            language: Some(language.into()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape(&self.lexical))?;
        match &self.language {
            Some(lang) => write!(f, "@{}", lang),
            None if self.datatype == xsd::STRING => Ok(()),
            None => write!(f, "^^<{}>", self.datatype),
        }
    }
}

/// RDF term
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Term {
    /// Named node
    Iri(String),
    /// Blank node identifier, without the `_:` prefix
    BlankNode(String),
    /// Literal value
    Literal(Literal),
}

impl Term {
    pub fn iri<S: Into<String>>(iri: S) -> Self {
        Term::Iri(iri.into())
    }

    pub fn blank<S: Into<String>>(id: S) -> Self {
        Term::BlankNode(id.into())
    }

    pub fn literal(literal: Literal) -> Self {
        Term::Literal(literal)
    }

    /// Shorthand for an `xsd:string` literal term
    pub fn string<S: Into<String>>(value: S) -> Self {
        Term::Literal(Literal::string(value))
    }

    /// Shorthand for a typed literal term
    pub fn typed<L: Into<String>, D: Into<String>>(lexical: L, datatype: D) -> Self {
        Term::Literal(Literal::typed(lexical, datatype))
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// IRIs and blank nodes can stand in subject position
    pub fn is_resource(&self) -> bool {
        matches!(self, Term::Iri(_) | Term::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Identifier used by JSON-LD `@id`: the IRI itself or `_:id` for blank nodes
    pub fn to_node_id(&self) -> Option<String> {
        match self {
            Term::Iri(iri) => Some(iri.clone()),
            Term::BlankNode(id) => Some(format!("_:{}", id)),
            Term::Literal(_) => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(id) => write!(f, "_:{}", id),
            Term::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

/// RDF Triple representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new<P: Into<String>>(subject: Term, predicate: P, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }

    /// Does this triple match the pattern? `None` is a wildcard.
    pub fn matches(&self, subject: Option<&Term>, predicate: Option<&str>, object: Option<&Term>) -> bool {
        subject.map_or(true, |s| &self.subject == s)
            && predicate.map_or(true, |p| self.predicate == p)
            && object.map_or(true, |o| &self.object == o)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

fn escape(lexical: &str) -> String {
    let mut out = String::with_capacity(lexical.len());
    for c in lexical.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
