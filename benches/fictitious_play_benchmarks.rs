use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gerryfair::auditor::{Auditor, RegressionAuditor};
use gerryfair::config::GameConfig;
use gerryfair::data::generate_synthetic;
use gerryfair::game::{FictitiousPlay, GameState};
use gerryfair::learner::CostSensitiveLearner;
use gerryfair::metric::as_f64;
use std::time::Duration;

pub fn game_benchmarks(c: &mut Criterion) {
    let owned = generate_synthetic(5_000, 10, 3, 1_500, 0).unwrap();
    let data = owned.view().unwrap();
    let costs = GameState::uniform_costs(data.rows(), data.negatives().len());
    let learner = CostSensitiveLearner::default();

    c.bench_function("learner best response", |b| {
        b.iter(|| learner.best_response(black_box(&costs), black_box(&data)).unwrap())
    });

    let q = learner.best_response(&costs, &data).unwrap();
    let a = as_f64(&q.predict(&data.x, false).unwrap());
    let auditor = RegressionAuditor::default();
    c.bench_function("auditor get group", |b| {
        b.iter(|| auditor.get_group(black_box(&a), black_box(&data), black_box(0.1)).unwrap())
    });

    let mut game_run = c.benchmark_group("game_run");
    game_run.measurement_time(Duration::from_secs(20));
    game_run.sample_size(10);
    game_run.bench_function("fictitious_play_serial", |b| {
        b.iter(|| {
            FictitiousPlay::new(GameConfig::default().set_max_iters(10))
                .unwrap()
                .fit(black_box(&data), black_box(&auditor))
                .unwrap()
        })
    });
    let parallel_auditor = RegressionAuditor::new(Default::default(), true);
    game_run.bench_function("fictitious_play_parallel", |b| {
        b.iter(|| {
            FictitiousPlay::new(GameConfig::default().set_max_iters(10).set_parallel(true))
                .unwrap()
                .fit(black_box(&data), black_box(&parallel_auditor))
                .unwrap()
        })
    });
    game_run.finish();
}

criterion_group!(benches, game_benchmarks);
criterion_main!(benches);
