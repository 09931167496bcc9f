//! Single-scenario evaluation and full dashboard assessment.
//!
//! Run with: `cargo bench --bench evaluator`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ev_policy_engine::assessment::{assess_scenario, baseline_scenario, generate_recommendations};
use ev_policy_engine::evaluator::{
    IncentiveType, ScenarioEvaluator, ScenarioInput, StakeholderPerspective,
};
use ev_policy_engine::research::ResearchCoefficients;

fn bench_evaluate(c: &mut Criterion) {
    let coefficients = ResearchCoefficients::default();
    let evaluator = ScenarioEvaluator::new(&coefficients);
    let input = ScenarioInput::new(
        4.5,
        35.0,
        IncentiveType::Subsidy,
        StakeholderPerspective::Investor,
    );

    c.bench_function("evaluate_scenario", |b| {
        b.iter(|| black_box(evaluator.evaluate(black_box(&input))))
    });
}

fn bench_assessment(c: &mut Criterion) {
    let scenario = baseline_scenario();

    c.bench_function("assess_and_recommend_baseline", |b| {
        b.iter(|| {
            let assessment = assess_scenario(black_box(&scenario));
            black_box(generate_recommendations(&scenario, &assessment))
        })
    });
}

criterion_group!(benches, bench_evaluate, bench_assessment);
criterion_main!(benches);
