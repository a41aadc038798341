// Integration tests for solidshape components
// These tests compile shapes, bind instances and project JSON-LD across crates

use solidshape_core::vocab::{rdf, rdfs, sh, xsd};
use solidshape_core::{Graph, SharedGraph, Term};

pub const EX: &str = "http://example.org/";

pub fn ex(local: &str) -> Term {
    Term::iri(format!("{}{}", EX, local))
}

/// Install a test subscriber honouring `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Person / Organization shapes referencing each other through `sh:class` and `sh:node`
pub fn org_chart_shapes() -> Graph {
    let mut graph = Graph::new();
    let int = |n: i64| Term::typed(n.to_string(), xsd::INTEGER);

    graph.add(ex("PersonShape"), rdf::TYPE, Term::iri(sh::NODE_SHAPE));
    graph.add(ex("PersonShape"), sh::TARGET_CLASS, ex("Person"));
    graph.add(ex("PersonShape"), rdfs::LABEL, Term::string("Person"));
    let props = [
        ("p_name", vec![
            (sh::PATH, ex("name")),
            (sh::DATATYPE, Term::iri(xsd::STRING)),
            (sh::MIN_COUNT, int(1)),
            (sh::MAX_COUNT, int(1)),
            (sh::ORDER, int(0)),
        ]),
        ("p_employer", vec![
            (sh::PATH, ex("worksFor")),
            (sh::CLASS, ex("Organization")),
            (sh::MAX_COUNT, int(1)),
            (sh::NAME, Term::string("employer")),
            (sh::ORDER, int(1)),
        ]),
        ("p_started", vec![
            (sh::PATH, ex("startedAt")),
            (sh::DATATYPE, Term::iri(xsd::DATE_TIME)),
            (sh::MAX_COUNT, int(1)),
            (sh::ORDER, int(2)),
        ]),
        ("p_salary", vec![
            (sh::PATH, ex("salary")),
            (sh::DATATYPE, Term::iri(xsd::DECIMAL)),
            (sh::MAX_COUNT, int(1)),
            (sh::ORDER, int(3)),
        ]),
    ];
    for (node, extra) in props {
        graph.add(ex("PersonShape"), sh::PROPERTY, Term::blank(node));
        for (p, o) in extra {
            graph.add(Term::blank(node), p, o);
        }
    }

    graph.add(ex("OrganizationShape"), rdf::TYPE, Term::iri(sh::NODE_SHAPE));
    graph.add(ex("OrganizationShape"), sh::TARGET_CLASS, ex("Organization"));
    graph.add(ex("OrganizationShape"), sh::PROPERTY, Term::blank("o_label"));
    graph.add(Term::blank("o_label"), sh::PATH, Term::iri(rdfs::LABEL));
    graph.add(Term::blank("o_label"), sh::DATATYPE, Term::iri(rdf::LANG_STRING));
    graph.add(Term::blank("o_label"), sh::MAX_COUNT, int(1));
    graph.add(ex("OrganizationShape"), sh::PROPERTY, Term::blank("o_members"));
    graph.add(Term::blank("o_members"), sh::PATH, ex("member"));
    graph.add(Term::blank("o_members"), sh::NODE, ex("PersonShape"));

    graph
}

pub fn empty_data() -> SharedGraph {
    SharedGraph::new(Graph::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::{DateTime, FixedOffset};
    use serde_json::json;
    use solidshape_core::{Literal, NativeValue};
    use solidshape_object::{AccessError, CardinalityError, JsonLdProjector, ShapeDataset};
    use solidshape_shacl::{compile_shapes, Cardinality, CompilerConfig, ErrorPolicy, ShapeCompiler, ShapeError};
    use std::sync::Arc;

    #[test]
    fn test_compile_bind_and_project_end_to_end() -> Result<()> {
        init_tracing();
        let model = Arc::new(compile_shapes(&org_chart_shapes())?);
        let person = model.shape_id("http://example.org/PersonShape").expect("person shape");
        let org = model.shape_id("http://example.org/OrganizationShape").expect("org shape");

        let names: Vec<_> = model[person].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "employer", "startedAt", "salary"]);
        assert_eq!(model[org].field("member").map(|f| f.cardinality), Some(Cardinality::Set));
        assert_eq!(model[org].field("label").map(|f| f.cardinality), Some(Cardinality::OptionalSingular));

        let graph = empty_data();
        let people = ShapeDataset::new(graph.clone(), model.clone(), person)?;
        let orgs = ShapeDataset::new(graph.clone(), model.clone(), org)?;

        let acme = orgs.create(ex("acme"))?;
        acme.write_singular(
            acme.field("label")?,
            NativeValue::LangString { value: "Acme".to_string(), language: "en".to_string() },
        )?;

        let alice = people.create(ex("alice"))?;
        alice.write_singular(alice.field("name")?, "Alice")?;
        alice.write_object(alice.field("employer")?, &acme)?;
        let started: DateTime<FixedOffset> = DateTime::parse_from_rfc3339("2021-09-01T09:00:00+02:00")?;
        alice.write_singular(alice.field("startedAt")?, started)?;
        alice.write_singular(
            alice.field("salary")?,
            solidshape_core::codec::decode(&Literal::typed("5000.50", xsd::DECIMAL))?,
        )?;

        let bob = people.create_blank()?;
        bob.write_singular(bob.field("name")?, "Bob")?;
        acme.write_object_set(acme.field("member")?, [&alice, &bob])?;

        assert_eq!(alice.read_object(alice.field("employer")?)?, acme);
        assert_eq!(alice.read_singular_as::<DateTime<FixedOffset>>(alice.field("startedAt")?)?, started);
        assert_eq!(acme.read_object_set(acme.field("member")?)?.len(), 2);

        let projected = JsonLdProjector::new().project(&alice)?;
        assert_eq!(
            projected,
            json!({
                "@id": "http://example.org/alice",
                "name": "Alice",
                "employer": "http://example.org/acme",
                "startedAt": { "@value": "2021-09-01T09:00:00+02:00", "@type": xsd::DATE_TIME },
                "salary": { "@value": "5000.5", "@type": xsd::DECIMAL },
            })
        );

        let org_doc = JsonLdProjector::new().project(&acme)?;
        assert_eq!(org_doc["label"], json!({ "@value": "Acme", "@language": "en" }));
        let members = org_doc["member"].as_array().expect("member array");
        assert!(members.contains(&json!("http://example.org/alice")));
        assert!(members.iter().any(|m| m.as_str().map_or(false, |s| s.starts_with("_:"))));
        Ok(())
    }

    #[test]
    fn test_dataset_document_with_context() -> Result<()> {
        let model = Arc::new(compile_shapes(&org_chart_shapes())?);
        let person = model.shape_id("http://example.org/PersonShape").expect("person shape");
        let graph = empty_data();
        let people = ShapeDataset::new(graph, model, person)?;

        for name in ["Ada", "Grace"] {
            let p = people.create(ex(&name.to_lowercase()))?;
            p.write_singular(p.field("name")?, name)?;
        }

        let document = JsonLdProjector::new().with_context(true).project_dataset(&people)?;
        assert_eq!(document["@context"]["employer"], json!({ "@id": "http://example.org/worksFor", "@type": "@id" }));
        assert_eq!(document["@context"]["name"], json!({ "@id": "http://example.org/name" }));
        assert_eq!(
            document["@graph"],
            json!([
                { "@id": "http://example.org/ada", "@type": "http://example.org/Person", "name": "Ada" },
                { "@id": "http://example.org/grace", "@type": "http://example.org/Person", "name": "Grace" },
            ])
        );
        Ok(())
    }

    #[test]
    fn test_graph_edits_visible_through_views() -> Result<()> {
        let model = Arc::new(compile_shapes(&org_chart_shapes())?);
        let person = model.shape_id("http://example.org/PersonShape").expect("person shape");
        let graph = empty_data();
        let people = ShapeDataset::new(graph.clone(), model, person)?;
        let alice = people.create(ex("alice"))?;

        graph.insert(solidshape_core::Triple::new(ex("alice"), "http://example.org/name", Term::string("A")));
        assert_eq!(alice.read_singular_as::<String>(alice.field("name")?)?, "A");

        graph.insert(solidshape_core::Triple::new(ex("alice"), "http://example.org/name", Term::string("B")));
        assert!(matches!(
            alice.read_singular(alice.field("name")?),
            Err(AccessError::Cardinality(CardinalityError::Multiple { .. }))
        ));

        graph.write().remove_matching(Some(&ex("alice")), None, None);
        assert!(people.is_empty());
        Ok(())
    }

    #[test]
    fn test_broken_shape_under_both_policies() -> Result<()> {
        init_tracing();
        let mut shapes = org_chart_shapes();
        shapes.add(ex("BadShape"), rdf::TYPE, Term::iri(sh::NODE_SHAPE));
        shapes.add(ex("BadShape"), sh::PROPERTY, Term::blank("bad"));
        shapes.add(Term::blank("bad"), sh::PATH, ex("x"));
        shapes.add(Term::blank("bad"), sh::DATATYPE, Term::iri(xsd::STRING));
        shapes.add(Term::blank("bad"), sh::CLASS, ex("Person"));

        assert!(matches!(compile_shapes(&shapes), Err(ShapeError::AmbiguousMapping { .. })));

        let config = CompilerConfig::from_json(r#"{"error_policy": "skip_shape"}"#)?;
        assert_eq!(config.error_policy, ErrorPolicy::SkipShape);
        let report = ShapeCompiler::new(config).compile(&shapes)?;
        assert_eq!(report.model.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].shape(), "http://example.org/BadShape");
        Ok(())
    }
}
