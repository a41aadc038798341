use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use solidshape_core::vocab::{rdf, sh, xsd};
use solidshape_core::{Graph, SharedGraph, Term};
use solidshape_object::{Instance, JsonLdProjector, ShapeDataset};
use solidshape_shacl::{compile_shapes, ClassModel, ShapeId};
use std::sync::Arc;

const PERSON: &str = "http://example.org/Person";
const NAME: &str = "http://example.org/name";
const KNOWS: &str = "http://example.org/knows";

fn person_model() -> Arc<ClassModel> {
    let shape = Term::iri("http://example.org/PersonShape");
    let mut shapes = Graph::new();
    shapes.add(shape.clone(), rdf::TYPE, Term::iri(sh::NODE_SHAPE));
    shapes.add(shape.clone(), sh::TARGET_CLASS, Term::iri(PERSON));

    shapes.add(shape.clone(), sh::PROPERTY, Term::blank("name"));
    shapes.add(Term::blank("name"), sh::PATH, Term::iri(NAME));
    shapes.add(Term::blank("name"), sh::DATATYPE, Term::iri(xsd::STRING));
    shapes.add(Term::blank("name"), sh::MAX_COUNT, Term::typed("1", xsd::INTEGER));

    shapes.add(shape.clone(), sh::PROPERTY, Term::blank("knows"));
    shapes.add(Term::blank("knows"), sh::PATH, Term::iri(KNOWS));
    shapes.add(Term::blank("knows"), sh::NODE, shape);

    Arc::new(compile_shapes(&shapes).unwrap())
}

/// `count` people, each knowing the next ten
fn people(count: usize) -> SharedGraph {
    let mut graph = Graph::new();
    for i in 0..count {
        let subject = Term::iri(format!("http://example.org/person{}", i));
        graph.add(subject.clone(), rdf::TYPE, Term::iri(PERSON));
        graph.add(subject.clone(), NAME, Term::string(format!("Person {}", i)));
        for j in 1..=10 {
            graph.add(
                subject.clone(),
                KNOWS,
                Term::iri(format!("http://example.org/person{}", (i + j) % count)),
            );
        }
    }
    graph.into()
}

fn benchmark_accessors(c: &mut Criterion) {
    let model = person_model();
    let graph = people(1_000);
    let person = Instance::new(Term::iri("http://example.org/person500"), ShapeId(0), model, graph).unwrap();
    let name = person.field("name").unwrap().clone();
    let knows = person.field("knows").unwrap().clone();

    c.bench_function("read_singular", |b| b.iter(|| black_box(person.read_singular(&name))));
    c.bench_function("write_singular", |b| {
        b.iter(|| black_box(person.write_singular(&name, "Renamed")))
    });
    c.bench_function("read_object_set", |b| b.iter(|| black_box(person.read_object_set(&knows))));
}

fn benchmark_enumeration(c: &mut Criterion) {
    let model = person_model();
    let mut group = c.benchmark_group("dataset_projection");

    for size in [100, 1_000] {
        let dataset = ShapeDataset::new(people(size), model.clone(), ShapeId(0)).unwrap();
        group.bench_with_input(BenchmarkId::new("instances", size), &dataset, |b, dataset| {
            b.iter(|| black_box(dataset.len()))
        });
        group.bench_with_input(BenchmarkId::new("jsonld", size), &dataset, |b, dataset| {
            b.iter(|| black_box(JsonLdProjector::new().project_dataset(dataset)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_accessors, benchmark_enumeration);
criterion_main!(benches);
