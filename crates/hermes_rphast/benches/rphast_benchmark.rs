use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use hermes_rphast::{
    ch::{
        ch_edge::EdgeCosts,
        ch_storage::{CHStorage, CHStorageBuilder},
        ch_weighting::CHWeighting,
    },
    matrix::{
        matrix_location::MatrixLocations,
        matrix_metrics::MetricSet,
        matrix_request::{MatrixConfig, MatrixRequest, Threads},
        rphast_matrix_algorithm::RPHASTMatrixAlgorithm,
    },
    meters,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

const NODES: usize = 100_000;

/// A random tree where deeper nodes rank lower, which is a valid hierarchy without shortcuts
fn create_tree_hierarchy(rng: &mut StdRng) -> CHStorage {
    let mut builder = CHStorageBuilder::new(NODES);
    let mut depths = vec![0usize; NODES];
    let mut parents = vec![0usize; NODES];

    for node in 1..NODES {
        let parent = rng.random_range(0..node);
        parents[node] = parent;
        depths[node] = depths[parent] + 1;
    }

    let mut order: Vec<usize> = (0..NODES).collect();
    order.sort_by(|a, b| depths[*b].cmp(&depths[*a]).then(a.cmp(b)));
    for (rank, node) in order.into_iter().enumerate() {
        builder.set_node_rank(node, rank);
    }

    for node in 1..NODES {
        let length = rng.random_range(10..2000);
        let costs = EdgeCosts::new(length, length * 90, meters!(length as i64));
        builder.add_edge(node, parents[node], costs);
        builder.add_edge(parents[node], node, costs);
    }

    builder.build().unwrap()
}

fn random_locations(rng: &mut StdRng, count: usize) -> MatrixLocations {
    let ids: Vec<i64> = (0..count)
        .map(|_| rng.random_range(0..NODES as i64))
        .collect();
    MatrixLocations::from_raw_node_ids(&ids)
}

fn rphast_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let hierarchy = create_tree_hierarchy(&mut rng);
    let weighting = CHWeighting::new();

    let request = MatrixRequest::new(
        random_locations(&mut rng, 100),
        random_locations(&mut rng, 100),
        MetricSet::all(),
    );

    let single = RPHASTMatrixAlgorithm::new(
        &hierarchy,
        &weighting,
        MatrixConfig {
            threads: Threads::Single,
            ..Default::default()
        },
    );
    c.bench_function("rphast 100x100 single thread", |b| {
        b.iter(|| single.compute(black_box(&request)).unwrap())
    });

    let multi = RPHASTMatrixAlgorithm::new(&hierarchy, &weighting, MatrixConfig::default());
    c.bench_function("rphast 100x100 all threads", |b| {
        b.iter(|| multi.compute(black_box(&request)).unwrap())
    });

    let cached = RPHASTMatrixAlgorithm::new(
        &hierarchy,
        &weighting,
        MatrixConfig {
            cache_subgraphs: true,
            ..Default::default()
        },
    );
    c.bench_function("rphast 100x100 cached subgraph", |b| {
        b.iter(|| cached.compute(black_box(&request)).unwrap())
    });
}

criterion_group!(benches, rphast_benchmark);
criterion_main!(benches);
