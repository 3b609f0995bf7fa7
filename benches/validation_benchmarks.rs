//! Validation Benchmarks
//!
//! Interactive editing validates one candidate edge per mouse release, so
//! single-edge checks should stay well under a millisecond even on large
//! diagrams.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use graphol_profiles::graph::{Diagram, EdgeKind, NodeId, NodeKind};
use graphol_profiles::profiles::Profile;

/// Concept hierarchy of `size` concepts, each defined as the intersection of
/// its parent and a fresh restriction.
fn hierarchy(size: usize) -> (Diagram, Vec<NodeId>) {
    let mut diagram = Diagram::new();
    let mut concepts = Vec::with_capacity(size);
    let role = diagram.add_node(NodeKind::Role, "test:partOf");
    for index in 0..size {
        let concept = diagram.add_node(NodeKind::Concept, format!("test:C{index}"));
        if let Some(&parent) = concepts.last() {
            let restriction = diagram.add_node(NodeKind::DomainRestriction, "exists");
            let intersection = diagram.add_node(NodeKind::Intersection, "");
            let edges = [
                (EdgeKind::Input, role, restriction),
                (EdgeKind::Input, parent, intersection),
                (EdgeKind::Input, restriction, intersection),
                (EdgeKind::Inclusion, concept, intersection),
            ];
            for (kind, source, target) in edges {
                diagram
                    .add_edge(kind, source, target)
                    .expect("benchmark endpoints exist");
            }
        }
        concepts.push(concept);
    }
    (diagram, concepts)
}

/// Chain of Neutral unions ending in a complement, fed by one intersection.
fn neutral_chain(length: usize) -> (Diagram, NodeId, NodeId) {
    let mut diagram = Diagram::new();
    let intersection = diagram.add_node(NodeKind::Intersection, "");
    let mut previous = intersection;
    for _ in 0..length {
        let union = diagram.add_node(NodeKind::Union, "");
        diagram
            .add_edge(EdgeKind::Input, previous, union)
            .expect("benchmark endpoints exist");
        previous = union;
    }
    let complement = diagram.add_node(NodeKind::Complement, "");
    diagram
        .add_edge(EdgeKind::Input, previous, complement)
        .expect("benchmark endpoints exist");
    let domain = diagram.add_node(NodeKind::ValueDomain, "xsd:string");
    (diagram, domain, intersection)
}

fn bench_single_edge(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_edge");
    let profile = Profile::owl2_ql();

    for size in [10, 100, 1_000] {
        let (diagram, concepts) = hierarchy(size);
        let first = concepts[0];
        let last = concepts[concepts.len() - 1];
        group.bench_with_input(BenchmarkId::new("inclusion", size), &diagram, |b, diagram| {
            b.iter(|| {
                black_box(profile.validate_edge(
                    black_box(diagram),
                    black_box(last),
                    EdgeKind::Inclusion,
                    black_box(first),
                ))
            })
        });
    }

    for length in [10, 100, 1_000] {
        let (diagram, domain, intersection) = neutral_chain(length);
        group.bench_with_input(
            BenchmarkId::new("reachable_complement", length),
            &diagram,
            |b, diagram| {
                b.iter(|| {
                    black_box(profile.validate_edge(
                        black_box(diagram),
                        domain,
                        EdgeKind::Input,
                        intersection,
                    ))
                })
            },
        );
    }

    group.finish();
}

fn bench_full_diagram(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_diagram");
    group.sample_size(20);

    for size in [100, 1_000] {
        let (diagram, _) = hierarchy(size);
        for profile in [Profile::owl2(), Profile::owl2_ql()] {
            group.bench_with_input(
                BenchmarkId::new(profile.name(), size),
                &diagram,
                |b, diagram| b.iter(|| black_box(profile.validate_diagram(black_box(diagram)))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_single_edge, bench_full_diagram);
criterion_main!(benches);
