//! Criterion benchmarks for u-swarmsched.
//!
//! Runs every variant preset on the reference deployments and measures
//! the fitness hot path on its own.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_swarmsched::fitness::EnergyModel;
use u_swarmsched::model::Deployment;
use u_swarmsched::swarm::{SwarmRunner, Variant};

fn bench_variants_primary(c: &mut Criterion) {
    let mut group = c.benchmark_group("variants_primary");
    group.sample_size(10);

    let problem = Deployment::primary()
        .problem()
        .expect("primary deployment is valid");
    for variant in Variant::ALL {
        let config = variant.config().with_max_iterations(300).with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(variant.name()),
            &config,
            |b, c| {
                b.iter(|| {
                    let result = SwarmRunner::run(black_box(&problem), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_immpa_deployments(c: &mut Criterion) {
    let mut group = c.benchmark_group("immpa_deployments");
    group.sample_size(10);

    for deployment in [Deployment::primary(), Deployment::secondary()] {
        let problem = deployment.problem().expect("deployment is valid");
        let config = Variant::Immpa.config().with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(&deployment.name),
            &(problem, config),
            |b, (p, c)| {
                b.iter(|| {
                    let result = SwarmRunner::run(black_box(p), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness");

    let problem = Deployment::primary()
        .problem()
        .expect("primary deployment is valid");
    let evaluator = problem.evaluator(EnergyModel::default());
    let mut rng = u_numflow::random::create_rng(7);
    let candidates: Vec<Vec<usize>> = (0..64)
        .map(|_| {
            (0..problem.task_count())
                .map(|_| rng.random_range(0..problem.resource_count()))
                .collect()
        })
        .collect();

    group.bench_function("primary_x64", |b| {
        b.iter(|| {
            let total: f64 = candidates
                .iter()
                .map(|c| evaluator.fitness(black_box(c)))
                .sum();
            black_box(total)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_variants_primary,
    bench_immpa_deployments,
    bench_fitness
);
criterion_main!(benches);
