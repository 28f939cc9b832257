use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nst_core::rng::RngHandle;
use nst_run::dummy::{dead_points_from_run, dummy_run};
use nst_run::{check_run, process_samples_array, CheckConfig};

fn reconstruct_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(42);
    let run = dummy_run(250, 40, 2, &mut rng).unwrap();
    let dead = dead_points_from_run(&run).unwrap();

    c.bench_function("process_10k_samples", |b| {
        b.iter(|| {
            let run = process_samples_array(black_box(&dead)).unwrap();
            black_box(run);
        });
    });

    let processed = process_samples_array(&dead).unwrap();
    c.bench_function("check_10k_samples", |b| {
        b.iter(|| {
            let report = check_run(black_box(&processed), &CheckConfig::default()).unwrap();
            black_box(report);
        });
    });
}

criterion_group!(benches, reconstruct_bench);
criterion_main!(benches);
