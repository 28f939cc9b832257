mod common;

use std::collections::BTreeMap;

use common::{split_scenario, NEG_INF};
use nst_core::errors::NsError;
use nst_core::rng::RngHandle;
use nst_run::dummy::dummy_thread;
use nst_run::{
    check_run, combine_runs, combine_threads, split_threads, CheckConfig, Matrix, NestedRun,
    ThreadBounds,
};

fn thread(logl: &[f64], birth: f64) -> NestedRun {
    let rows: Vec<[f64; 1]> = logl.iter().map(|&value| [value * 10.0]).collect();
    NestedRun {
        logl: logl.to_vec(),
        theta: Matrix::from_rows(&rows).unwrap(),
        thread_labels: vec![0; logl.len()],
        thread_min_max: vec![ThreadBounds {
            birth,
            last: logl[logl.len() - 1],
        }],
        nlive_array: vec![1.0; logl.len()],
        output: BTreeMap::new(),
    }
}

#[test]
fn split_then_combine_restores_the_run() {
    let run = split_scenario();
    assert_eq!(run.thread_indices(1), vec![1, 3, 4]);
    let threads = split_threads(&run).unwrap();
    assert_eq!(threads.len(), 3);
    assert_eq!(threads[1].logl, vec![2.0, 4.0, 5.0]);
    assert_eq!(threads[2].thread_min_max[0].birth, 4.0);

    let mut rng = RngHandle::from_seed(3);
    let combined = combine_threads(&threads, &mut rng).unwrap();
    assert_eq!(combined, run);
}

#[test]
fn missing_birth_point_uses_nearest_sample() {
    let threads = [thread(&[1.0, 4.0, 5.0], NEG_INF), thread(&[4.5], 3.9)];
    let mut rng = RngHandle::from_seed(4);
    let run = combine_threads(&threads, &mut rng).unwrap();
    assert_eq!(run.logl, vec![1.0, 4.0, 4.5, 5.0]);
    assert_eq!(run.thread_labels, vec![0, 0, 1, 0]);
    assert_eq!(run.nlive_array, vec![1.0, 1.0, 2.0, 1.0]);
    assert_eq!(run.theta.column(0), vec![10.0, 40.0, 45.0, 50.0]);
}

#[test]
fn merged_copies_need_relaxed_checking() {
    let run = split_scenario();
    let mut rng = RngHandle::from_seed(5);
    let merged = combine_runs(&[run.clone(), run], &mut rng).unwrap();
    assert_eq!(merged.len(), 12);
    assert_eq!(merged.nthreads(), 6);
    assert_eq!(merged.nlive_array[0], 4.0);

    let err = check_run(&merged, &CheckConfig::strict()).unwrap_err();
    assert!(err.is_precision());
    let report = check_run(&merged, &CheckConfig::relaxed()).unwrap();
    assert_eq!(report.duplicate_logls.unwrap().repeats, 6);
}

#[test]
fn random_tie_break_is_seeded() {
    let run = split_scenario();
    let a = combine_runs(&[run.clone(), run.clone()], &mut RngHandle::from_seed(11)).unwrap();
    let b = combine_runs(&[run.clone(), run], &mut RngHandle::from_seed(11)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn multi_thread_inputs_are_rejected() {
    let run = split_scenario();
    let err = combine_threads(&[run], &mut RngHandle::from_seed(0)).unwrap_err();
    assert!(matches!(err, NsError::Malformed(info) if info.code == "combine.not-a-thread"));
}

#[test]
fn parameter_counts_must_agree() {
    let mut rng = RngHandle::from_seed(6);
    let a = dummy_thread(4, 2, NEG_INF, &mut rng).unwrap();
    let b = dummy_thread(4, 3, NEG_INF, &mut rng).unwrap();
    let err = combine_threads(&[a, b], &mut rng).unwrap_err();
    assert_eq!(err.code(), "combine.theta-cols");
}
