//! Class model builder
//!
//! Turns loaded shapes into a [`ClassModel`]: derives field names, applies
//! the cardinality policy, resolves shape references to [`ShapeId`]s and
//! applies the configured [`ErrorPolicy`].

use crate::config::{CompilerConfig, ErrorPolicy};
use crate::loader::{DefaultShapeLoader, NodeShape, ShapeLoader, ValueRef};
use crate::model::{Cardinality, ClassModel, FieldDescriptor, NodeShapeDescriptor, ShapeId, ValueKind};
use crate::naming::derive_name;
use crate::ShapeError;
use solidshape_core::{CodecId, Graph};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Compilation outcome
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    pub model: ClassModel,
    /// Shapes rejected under [`ErrorPolicy::SkipShape`], in discovery order
    pub rejected: Vec<ShapeError>,
}

impl CompileReport {
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Shape compiler
#[derive(Debug, Clone, Default)]
pub struct ShapeCompiler {
    config: CompilerConfig,
}

/// A loaded shape whose field names have been derived
struct Named {
    shape: NodeShape,
    names: Vec<String>,
}

impl ShapeCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile every node shape in `graph`
    pub fn compile(&self, graph: &Graph) -> Result<CompileReport, ShapeError> {
        self.compile_with(&DefaultShapeLoader, graph)
    }

    /// Compile with a custom loader
    pub fn compile_with<L: ShapeLoader>(&self, loader: &L, graph: &Graph) -> Result<CompileReport, ShapeError> {
        let loaded = loader.load(graph);
        info!(shapes = loaded.entries.len(), "compiling shapes");

        let mut rejected = Vec::new();
        let mut named = Vec::new();

        for entry in loaded.entries {
            let result = entry.shape.and_then(|shape| self.name_fields(shape));
            match result {
                Ok(shape) => named.push(shape),
                Err(err) => self.reject(err, &mut rejected)?,
            }
        }

        // Anything pointing at a rejected shape goes too, until nothing changes
        loop {
            let accepted: HashSet<&str> = named.iter().map(|n| n.shape.id.as_str()).collect();
            let dangling = named.iter().enumerate().find_map(|(index, n)| {
                n.shape.properties.iter().find_map(|p| match &p.value {
                    ValueRef::Shape(target) if !accepted.contains(target.as_str()) => {
                        Some((index, p.path.clone(), target.clone()))
                    }
                    _ => None,
                })
            });
            let Some((index, property, reference)) = dangling else { break };

            let shape = named.remove(index).shape;
            self.reject(
                ShapeError::UnresolvedShapeReference {
                    shape: shape.id,
                    property,
                    reference,
                },
                &mut rejected,
            )?;
        }

        let ids: HashMap<String, ShapeId> = named
            .iter()
            .enumerate()
            .map(|(i, n)| (n.shape.id.clone(), ShapeId(i)))
            .collect();

        let mut model = ClassModel::new();
        for Named { shape, names } in named {
            let fields = shape
                .properties
                .into_iter()
                .zip(names)
                .map(|(property, name)| {
                    let min_count = property.min_count.unwrap_or(0);
                    let value_kind = match property.value {
                        ValueRef::Datatype(datatype) => {
                            let codec = CodecId::for_datatype(&datatype);
                            if codec.is_none() {
                                debug!(datatype = %datatype, field = %name, "no codec registered for datatype");
                            }
                            ValueKind::Literal { datatype, codec }
                        }
                        ValueRef::Shape(target) => ValueKind::Object {
                            // Every surviving reference is in `ids` after the fixpoint
                            shape: ids.get(&target).copied().unwrap_or_default(),
                        },
                    };
                    FieldDescriptor {
                        name,
                        predicate: property.path,
                        cardinality: Cardinality::from_bounds(min_count, property.max_count),
                        min_count,
                        max_count: property.max_count,
                        value_kind,
                    }
                })
                .collect();

            let id = model.push(NodeShapeDescriptor {
                id: shape.id,
                target_class: shape.target_class,
                label: shape.label,
                fields,
            });
            debug!(shape = %id, "compiled shape");
        }

        info!(compiled = model.len(), rejected = rejected.len(), "shape compilation finished");
        Ok(CompileReport { model, rejected })
    }

    fn name_fields(&self, shape: NodeShape) -> Result<Named, ShapeError> {
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(shape.properties.len());
        for property in &shape.properties {
            let name = derive_name(property.name.as_deref(), &property.path, self.config.name_case);
            if !seen.insert(name.clone()) {
                return Err(ShapeError::DuplicateName {
                    shape: shape.id.clone(),
                    property: property.path.clone(),
                    name,
                });
            }
            names.push(name);
        }
        Ok(Named { shape, names })
    }

    fn reject(&self, err: ShapeError, rejected: &mut Vec<ShapeError>) -> Result<(), ShapeError> {
        match self.config.error_policy {
            ErrorPolicy::Abort => Err(err),
            ErrorPolicy::SkipShape => {
                warn!(shape = %err.shape(), error = %err, "rejecting shape");
                rejected.push(err);
                Ok(())
            }
        }
    }
}

/// Compile `graph` with the default configuration
pub fn compile_shapes(graph: &Graph) -> Result<ClassModel, ShapeError> {
    ShapeCompiler::default().compile(graph).map(|report| report.model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NameCase;
    use solidshape_core::vocab::{rdf, sh, xsd};
    use solidshape_core::{Term, Triple};

    fn ex(local: &str) -> Term {
        Term::iri(format!("http://example.org/{}", local))
    }

    fn node_shape(graph: &mut Graph, shape: &str, class: &str) {
        graph.add(ex(shape), rdf::TYPE, Term::iri(sh::NODE_SHAPE));
        graph.add(ex(shape), sh::TARGET_CLASS, ex(class));
    }

    fn property(graph: &mut Graph, shape: &str, node: &str, extra: Vec<(&str, Term)>) {
        let bnode = Term::blank(node);
        graph.add(ex(shape), sh::PROPERTY, bnode.clone());
        for (p, o) in extra {
            graph.insert(Triple::new(bnode.clone(), p, o));
        }
    }

    fn one() -> Term {
        Term::typed("1", xsd::INTEGER)
    }

    #[test]
    fn test_compile_empty_graph() {
        let model = compile_shapes(&Graph::new()).unwrap();
        assert!(model.is_empty());
    }

    #[test]
    fn test_cardinality_and_codec() {
        let mut graph = Graph::new();
        node_shape(&mut graph, "S", "C");
        property(&mut graph, "S", "a", vec![
            (sh::PATH, ex("age")),
            (sh::DATATYPE, Term::iri(xsd::INTEGER)),
            (sh::MIN_COUNT, one()),
            (sh::MAX_COUNT, one()),
        ]);
        property(&mut graph, "S", "b", vec![
            (sh::PATH, ex("nick")),
            (sh::DATATYPE, Term::iri("http://example.org/customType")),
        ]);

        let model = compile_shapes(&graph).unwrap();
        let shape = model.by_iri("http://example.org/S").unwrap();
        let age = shape.field("age").unwrap();
        assert_eq!(age.cardinality, Cardinality::RequiredSingular);
        assert!(matches!(age.value_kind, ValueKind::Literal { codec: Some(CodecId::Integer), .. }));
        let nick = shape.field("nick").unwrap();
        assert_eq!(nick.cardinality, Cardinality::Set);
        assert!(matches!(nick.value_kind, ValueKind::Literal { codec: None, .. }));
    }

    #[test]
    fn test_duplicate_name_aborts() {
        let mut graph = Graph::new();
        node_shape(&mut graph, "S", "C");
        property(&mut graph, "S", "a", vec![(sh::PATH, ex("name"))]);
        property(&mut graph, "S", "b", vec![(sh::PATH, Term::iri("http://xmlns.com/foaf/0.1/name"))]);

        let err = compile_shapes(&graph).unwrap_err();
        assert!(matches!(err, ShapeError::DuplicateName { ref name, .. } if name == "name"));
    }

    #[test]
    fn test_skip_policy_rejects_dependents() {
        let mut graph = Graph::new();
        node_shape(&mut graph, "Broken", "B");
        property(&mut graph, "Broken", "a", vec![(sh::DATATYPE, Term::iri(xsd::STRING))]);
        node_shape(&mut graph, "Dependent", "D");
        property(&mut graph, "Dependent", "b", vec![(sh::PATH, ex("link")), (sh::NODE, ex("Broken"))]);
        node_shape(&mut graph, "Fine", "F");
        property(&mut graph, "Fine", "c", vec![(sh::PATH, ex("title"))]);

        let compiler = ShapeCompiler::new(CompilerConfig::new().with_error_policy(ErrorPolicy::SkipShape));
        let report = compiler.compile(&graph).unwrap();

        assert_eq!(report.model.len(), 1);
        assert_eq!(report.model.shape_id("http://example.org/Fine"), Some(ShapeId(0)));
        assert_eq!(report.rejected.len(), 2);
        assert!(matches!(report.rejected[0], ShapeError::MissingPath { .. }));
        assert!(matches!(
            &report.rejected[1],
            ShapeError::UnresolvedShapeReference { shape, .. } if shape == "http://example.org/Dependent"
        ));
    }

    #[test]
    fn test_abort_policy_fails_fast() {
        let mut graph = Graph::new();
        node_shape(&mut graph, "Broken", "B");
        property(&mut graph, "Broken", "a", vec![(sh::DATATYPE, Term::iri(xsd::STRING))]);

        assert!(matches!(compile_shapes(&graph), Err(ShapeError::MissingPath { .. })));
    }

    #[test]
    fn test_snake_case_names() {
        let mut graph = Graph::new();
        node_shape(&mut graph, "S", "C");
        property(&mut graph, "S", "a", vec![(sh::PATH, ex("givenName"))]);

        let compiler = ShapeCompiler::new(CompilerConfig::new().with_name_case(NameCase::Snake));
        let model = compiler.compile(&graph).unwrap().model;
        assert!(model.by_iri("http://example.org/S").unwrap().field("given_name").is_some());
    }
}
