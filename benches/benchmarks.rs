criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        building_cost_dense,
        building_cost_lazy,
        sweeping_sinkhorn_dense,
        sweeping_sinkhorn_lazy,
        solving_sinkhorn_lazy,
        solving_annealing_lazy,
        estimating_primal_cost,
        streaming_logsumexp,
}

fn building_cost_dense(c: &mut criterion::Criterion) {
    let (x, y) = (Measure::random(), Measure::random());
    c.bench_function("materialize a dense 64x64 cost matrix", |b| {
        b.iter(|| Backend::Dense.evaluate(&x, &y).map(|cost| cost.shape()))
    });
}

fn building_cost_lazy(c: &mut criterion::Criterion) {
    let (x, y) = (Measure::random(), Measure::random());
    c.bench_function("wrap a lazy 64x64 cost evaluator", |b| {
        b.iter(|| Backend::Lazy.evaluate(&x, &y).map(|cost| cost.shape()))
    });
}

fn sweeping_sinkhorn_dense(c: &mut criterion::Criterion) {
    let (x, y) = (Measure::random(), Measure::random());
    let ref cost = Dense::new(&x, &y).expect("same dimension");
    let ref loga = x.log_weights().expect("positive weights");
    let ref logb = y.log_weights().expect("positive weights");
    let mut duals = Duals::zeros(x.len(), y.len(), 0.01);
    c.bench_function("one Sinkhorn sweep over a dense cost", |b| {
        b.iter(|| duals.sweep(cost, loga, logb, 0.01))
    });
}

fn sweeping_sinkhorn_lazy(c: &mut criterion::Criterion) {
    let (x, y) = (Measure::random(), Measure::random());
    let ref cost = Lazy::new(&x, &y).expect("same dimension");
    let ref loga = x.log_weights().expect("positive weights");
    let ref logb = y.log_weights().expect("positive weights");
    let mut duals = Duals::zeros(x.len(), y.len(), 0.01);
    c.bench_function("one Sinkhorn sweep over a lazy cost", |b| {
        b.iter(|| duals.sweep(cost, loga, logb, 0.01))
    });
}

fn solving_sinkhorn_lazy(c: &mut criterion::Criterion) {
    let (x, y) = (Measure::random(), Measure::random());
    let sinkhorn = Sinkhorn::new(0.1, 100, Backend::Lazy);
    c.bench_function("solve entropic OT (100 Sinkhorn sweeps)", |b| {
        b.iter(|| sinkhorn.solve(&x, &y))
    });
}

fn solving_annealing_lazy(c: &mut criterion::Criterion) {
    let (x, y) = (Measure::random(), Measure::random());
    let annealing = Annealing::new(0.1, 0.9, Backend::Lazy);
    c.bench_function("solve entropic OT (ε-scaling, s = 0.9)", |b| {
        b.iter(|| annealing.solve(&x, &y))
    });
    /*
    SCALING  SWEEPS ([-1, 1]³ cube, σ = 0.1)
      0.5       8
      0.9      36
      0.99    355
     */
}

fn estimating_primal_cost(c: &mut criterion::Criterion) {
    let (x, y) = (Measure::random(), Measure::random());
    let ref cost = Dense::new(&x, &y).expect("same dimension");
    let ref duals = Sinkhorn::new(0.1, 100, Backend::Dense)
        .solve_with(&x, &y, cost)
        .expect("valid problem");
    c.bench_function("estimate primal cost ⟨C, π⟩", |b| {
        b.iter(|| Estimator::Primal.estimate(&x, &y, duals, cost))
    });
}

fn streaming_logsumexp(c: &mut criterion::Criterion) {
    let values = (0..4096).map(|i| (i as f64).sin() * 100.).collect::<Vec<_>>();
    c.bench_function("stream log-sum-exp over 4096 values", |b| {
        b.iter(|| {
            values
                .chunks(otbench::COST_TILE)
                .fold(LogSumExp::default(), |mut lse, tile| {
                    lse.extend(tile);
                    lse
                })
                .value()
        })
    });
}

use otbench::Arbitrary;
use otbench::transport::Annealing;
use otbench::transport::Backend;
use otbench::transport::Cost;
use otbench::transport::Dense;
use otbench::transport::Duals;
use otbench::transport::Estimator;
use otbench::transport::Lazy;
use otbench::transport::LogSumExp;
use otbench::transport::Measure;
use otbench::transport::Sinkhorn;
