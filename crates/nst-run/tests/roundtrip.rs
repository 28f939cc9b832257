mod common;

use common::same_up_to_relabel;
use nst_core::rng::RngHandle;
use nst_run::dummy::{dead_points_from_run, dummy_dead_points, dummy_run, dummy_thread};
use nst_run::{
    check_run, combine_threads, process_samples, process_samples_array, CheckConfig, Matrix,
    NestedRun,
};
use proptest::prelude::*;
use rand::seq::SliceRandom;

fn shuffled(samples: &Matrix, rng: &mut RngHandle) -> Matrix {
    let mut rows: Vec<Vec<f64>> = samples.iter_rows().map(<[f64]>::to_vec).collect();
    rows.shuffle(rng);
    Matrix::from_rows(&rows).unwrap()
}

/// A run of `nprior` prior threads plus `nextra` threads, each born on a
/// non-final sample of an earlier thread. About a third of the extra threads
/// reuse the previous birth contour so that contours split more than once.
fn branching_run(
    nprior: usize,
    nextra: usize,
    nsamples: usize,
    rng: &mut RngHandle,
) -> NestedRun {
    let mut threads: Vec<NestedRun> = (0..nprior)
        .map(|_| dummy_thread(nsamples, 2, f64::NEG_INFINITY, rng).unwrap())
        .collect();
    let mut previous_birth = None;
    for _ in 0..nextra {
        let birth = match previous_birth {
            Some(contour) if rng.pick(3) == Some(0) => contour,
            _ => {
                let parent = &threads[rng.pick(threads.len()).unwrap()];
                parent.logl[rng.pick(parent.len() - 1).unwrap()]
            }
        };
        threads.push(dummy_thread(nsamples, 2, birth, rng).unwrap());
        previous_birth = Some(birth);
    }
    combine_threads(&threads, rng).unwrap()
}

#[test]
fn dynamic_dead_points_recover_the_generating_run() {
    let mut rng = RngHandle::from_seed(0);
    let (dead, expected) = dummy_dead_points(2, 10, true, &mut rng).unwrap();
    let (run, report) = process_samples(&dead, &CheckConfig::default()).unwrap();
    assert!(report.is_clean());
    assert_eq!(run, expected);
    assert_eq!(run.nthreads(), 2);
    assert_eq!(run.thread_min_max[1].birth, run.logl[0]);
    assert_eq!(run.nlive_array[0], 1.0);
    assert_eq!(run.nlive_array[1], 2.0);
}

#[test]
fn static_dead_points_recover_the_generating_run() {
    let mut rng = RngHandle::from_seed(1);
    let (dead, expected) = dummy_dead_points(3, 12, false, &mut rng).unwrap();
    let run = process_samples_array(&dead).unwrap();
    assert_eq!(run, expected);
    assert!(run.thread_min_max.iter().all(|b| b.starts_from_prior()));
}

#[test]
fn dynamic_generator_needs_two_samples() {
    let mut rng = RngHandle::from_seed(2);
    let err = dummy_dead_points(1, 1, true, &mut rng).unwrap_err();
    assert_eq!(err.code(), "dummy.dynamic-too-short");
}

proptest! {
    #[test]
    fn two_thread_arrays_roundtrip(
        seed in any::<u64>(),
        ndim in 1usize..4,
        nsamples in 2usize..30,
        dynamic in any::<bool>(),
    ) {
        let mut rng = RngHandle::from_seed(seed);
        let (dead, expected) = dummy_dead_points(ndim, nsamples, dynamic, &mut rng).unwrap();
        let run = process_samples_array(&shuffled(&dead, &mut rng)).unwrap();
        prop_assert_eq!(&run, &expected);
        prop_assert!(check_run(&run, &CheckConfig::default()).is_ok());
    }

    #[test]
    fn static_runs_roundtrip_up_to_relabel(
        seed in any::<u64>(),
        nlive in 1usize..12,
        nsamples in 1usize..20,
    ) {
        let mut rng = RngHandle::from_seed(seed);
        let expected = dummy_run(nlive, nsamples, 2, &mut rng).unwrap();
        let dead = dead_points_from_run(&expected).unwrap();
        let run = process_samples_array(&shuffled(&dead, &mut rng)).unwrap();
        prop_assert!(same_up_to_relabel(&run.thread_labels, &expected.thread_labels));
        prop_assert_eq!(&run.nlive_array, &expected.nlive_array);
        prop_assert_eq!(&run.logl, &expected.logl);
        prop_assert_eq!(run.nthreads(), nlive);
        prop_assert!(check_run(&run, &CheckConfig::default()).is_ok());
    }

    #[test]
    fn branching_runs_roundtrip(
        seed in any::<u64>(),
        nprior in 1usize..4,
        nextra in 1usize..7,
        nsamples in 2usize..6,
    ) {
        let mut rng = RngHandle::from_seed(seed);
        let expected = branching_run(nprior, nextra, nsamples, &mut rng);
        let dead = dead_points_from_run(&expected).unwrap();
        let run = process_samples_array(&shuffled(&dead, &mut rng)).unwrap();
        prop_assert_eq!(&run.logl, &expected.logl);
        prop_assert_eq!(&run.nlive_array, &expected.nlive_array);
        prop_assert_eq!(run.nthreads(), nprior + nextra);
        prop_assert!(check_run(&run, &CheckConfig::default()).is_ok());
    }
}
