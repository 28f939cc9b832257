//! Synthetic runs and dead-point arrays with known thread structure.

use std::collections::BTreeMap;

use nst_core::errors::{ErrorInfo, NsError};
use nst_core::rng::RngHandle;

use crate::combine::combine_threads;
use crate::matrix::Matrix;
use crate::run::{NestedRun, ThreadBounds};

/// Birth value written for samples drawn from the whole prior (PolyChord's
/// convention).
pub const PRIOR_SENTINEL: f64 = -1e30;

/// A single thread of `nsamples` uniform log-likelihoods shifted by
/// `logl_start` (when finite), with uniform parameters in `[0, 1)`.
pub fn dummy_thread(
    nsamples: usize,
    ndim: usize,
    logl_start: f64,
    rng: &mut RngHandle,
) -> Result<NestedRun, NsError> {
    if nsamples == 0 {
        return Err(NsError::Malformed(ErrorInfo::new(
            "dummy.empty-thread",
            "a thread needs at least one sample",
        )));
    }
    let mut logl: Vec<f64> = (0..nsamples).map(|_| rng.unit()).collect();
    logl.sort_by(f64::total_cmp);
    if logl_start.is_finite() {
        for value in &mut logl {
            *value += logl_start;
        }
    }
    let theta: Vec<f64> = (0..nsamples * ndim).map(|_| rng.unit()).collect();
    let last = logl[nsamples - 1];
    Ok(NestedRun {
        logl,
        theta: Matrix::from_shape_vec(nsamples, ndim, theta)?,
        thread_labels: vec![0; nsamples],
        thread_min_max: vec![ThreadBounds {
            birth: logl_start,
            last,
        }],
        nlive_array: vec![1.0; nsamples],
        output: BTreeMap::new(),
    })
}

/// A static run of `nlive` prior-born threads with `nsamples` points each.
///
/// Thread `i` is drawn from substream `i` of a seed forked off `rng`, so a
/// thread's samples do not depend on how many threads precede it.
pub fn dummy_run(
    nlive: usize,
    nsamples: usize,
    ndim: usize,
    rng: &mut RngHandle,
) -> Result<NestedRun, NsError> {
    let master = rng.fork_seed();
    let threads = (0..nlive as u64)
        .map(|i| {
            let mut thread_rng = RngHandle::substream(master, i);
            dummy_thread(nsamples, ndim, f64::NEG_INFINITY, &mut thread_rng)
        })
        .collect::<Result<Vec<_>, _>>()?;
    combine_threads(&threads, rng)
}

/// Rebuilds the `[theta..., logl, birth_logl]` array a sampler would have
/// written for `run`.
///
/// The first sample of each thread gets its recorded birth contour (or
/// [`PRIOR_SENTINEL`] for prior-born threads); every later sample was born on
/// its predecessor in the same thread.
pub fn dead_points_from_run(run: &NestedRun) -> Result<Matrix, NsError> {
    let ndim = run.theta.cols();
    let mut previous: Vec<Option<f64>> = vec![None; run.nthreads()];
    let mut data = Vec::with_capacity(run.len() * (ndim + 2));
    for (idx, &label) in run.thread_labels.iter().enumerate() {
        let bounds = run.thread_min_max.get(label).ok_or_else(|| {
            NsError::Malformed(
                ErrorInfo::new("dummy.label-out-of-range", "thread label has no bounds")
                    .with_context("index", idx.to_string())
                    .with_context("label", label.to_string()),
            )
        })?;
        let birth = match previous[label] {
            Some(value) => value,
            None if bounds.starts_from_prior() => PRIOR_SENTINEL,
            None => bounds.birth,
        };
        previous[label] = Some(run.logl[idx]);
        data.extend_from_slice(run.theta.row(idx));
        data.push(run.logl[idx]);
        data.push(birth);
    }
    Matrix::from_shape_vec(run.len(), ndim + 2, data)
}

/// A dead-points array of two threads and the run it should reconstruct to.
///
/// With `dynamic` the second thread is born on the first thread's lowest
/// likelihood, and its likelihoods are shifted up by one so that the first
/// thread's second point is the earlier of the two births on that contour
/// (keeping thread labels aligned with the generator's order). Otherwise both
/// threads start from the prior and are ordered by their first likelihood.
///
/// A dynamic array needs `nsamples >= 2`: with a single point the first thread
/// has no successor of its own and the second thread's birth is read back as
/// a continuation.
pub fn dummy_dead_points(
    ndim: usize,
    nsamples: usize,
    dynamic: bool,
    rng: &mut RngHandle,
) -> Result<(Matrix, NestedRun), NsError> {
    if dynamic && nsamples < 2 {
        return Err(NsError::Malformed(
            ErrorInfo::new(
                "dummy.dynamic-too-short",
                "dynamic dead points need two samples per thread",
            )
            .with_context("nsamples", nsamples.to_string()),
        ));
    }
    let first = dummy_thread(nsamples, ndim, f64::NEG_INFINITY, rng)?;
    let mut threads = if dynamic {
        let mut second = dummy_thread(nsamples, ndim, first.logl[0], rng)?;
        for value in &mut second.logl {
            *value += 1.0;
        }
        second.thread_min_max[0].last += 1.0;
        vec![first, second]
    } else {
        let second = dummy_thread(nsamples, ndim, f64::NEG_INFINITY, rng)?;
        vec![first, second]
    };
    threads.sort_by(|a, b| a.logl[0].total_cmp(&b.logl[0]));
    let run = combine_threads(&threads, rng)?;
    let dead = dead_points_from_run(&run)?;
    Ok((dead, run))
}
