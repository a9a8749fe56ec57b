use aspect_model::rdf::{Graph, RdfFormat, RdfParser};
use aspect_model::{migrate, ModelUrn, ResolutionError, ResolutionResult, Resolver, Validator};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;

const NS: &str = "urn:samm:com.example.bench:1.0.0#";
const PREFIXES: &str = "@prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:2.0.0#> .\n\
                        @prefix samm-c: <urn:samm:org.eclipse.esmf.samm:characteristic:2.0.0#> .\n\
                        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n";

/// One file per element: an aspect with `size` properties, each with its own characteristic
fn model_files(size: usize) -> HashMap<String, String> {
    let mut files = HashMap::new();
    let properties: Vec<String> = (0..size).map(|i| format!("<{}p{}>", NS, i)).collect();
    files.insert(
        format!("{}Bench", NS),
        format!(
            "{}<{}Bench> a samm:Aspect ; samm:preferredName \"Bench\"@en ;\n\
             samm:properties ( {} ) ; samm:operations ( ) .\n",
            PREFIXES,
            NS,
            properties.join(" ")
        ),
    );
    for i in 0..size {
        files.insert(
            format!("{}p{}", NS, i),
            format!(
                "{}<{}p{}> a samm:Property ; samm:characteristic <{}C{}> .\n",
                PREFIXES, NS, i, NS, i
            ),
        );
        files.insert(
            format!("{}C{}", NS, i),
            format!(
                "{}<{}C{}> a samm:Characteristic ; samm:dataType xsd:string ;\n\
                 samm:description \"characteristic {}\" .\n",
                PREFIXES, NS, i, i
            ),
        );
    }
    files
}

fn lookup(files: &HashMap<String, String>, urn: &ModelUrn) -> ResolutionResult<Graph> {
    let text = files
        .get(&urn.to_string())
        .ok_or_else(|| ResolutionError::NotFound(urn.clone()))?;
    RdfParser::parse(text, RdfFormat::Turtle).map_err(|e| ResolutionError::io(urn, e.to_string()))
}

/// Benchmark transitive resolution, sequential and parallel
fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    let root = ModelUrn::parse(&format!("{}Bench", NS)).unwrap();

    for size in [10, 100, 500].iter() {
        let files = model_files(*size);
        let strategy = |urn: &ModelUrn| lookup(&files, urn);

        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, _| {
            b.iter(|| {
                let graph = Resolver::new().resolve(&root, &strategy).unwrap();
                criterion::black_box(graph.len());
            });
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), size, |b, _| {
            b.iter(|| {
                let graph = Resolver::new().parallel(true).resolve(&root, &strategy).unwrap();
                criterion::black_box(graph.len());
            });
        });
    }
    group.finish();
}

/// Benchmark migration of a resolved 2.0.0 model
fn bench_migration(c: &mut Criterion) {
    let mut group = c.benchmark_group("migration");
    let root = ModelUrn::parse(&format!("{}Bench", NS)).unwrap();

    for size in [10, 100, 500].iter() {
        let files = model_files(*size);
        let strategy = |urn: &ModelUrn| lookup(&files, urn);
        let graph = Resolver::new().resolve(&root, &strategy).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let migrated = migrate(graph.clone()).unwrap();
                criterion::black_box(migrated.len());
            });
        });
    }
    group.finish();
}

/// Benchmark validation against the bundled shapes
fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let root = ModelUrn::parse(&format!("{}Bench", NS)).unwrap();
    let validator = Validator::bundled().unwrap();

    for size in [10, 100, 500].iter() {
        let files = model_files(*size);
        let strategy = |urn: &ModelUrn| lookup(&files, urn);
        let graph = migrate(Resolver::new().resolve(&root, &strategy).unwrap()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let report = validator.validate(&graph);
                // every characteristic description lacks a language tag
                criterion::black_box(report.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolution, bench_migration, bench_validation);
criterion_main!(benches);
