//! Merging single-thread runs into one run.

use std::collections::BTreeMap;

use nst_core::errors::{ErrorInfo, NsError};
use nst_core::rng::RngHandle;

use crate::check::check_members;
use crate::matrix::Matrix;
use crate::run::{NestedRun, ThreadBounds};

/// Splits a run into single-thread runs, one per thread label.
///
/// Each thread keeps its bounds and has one live point throughout.
pub fn split_threads(run: &NestedRun) -> Result<Vec<NestedRun>, NsError> {
    check_members(run)?;
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); run.nthreads()];
    for (idx, &label) in run.thread_labels.iter().enumerate() {
        let slot = members.get_mut(label).ok_or_else(|| {
            NsError::Malformed(
                ErrorInfo::new("combine.label-out-of-range", "thread label has no bounds")
                    .with_context("index", idx.to_string())
                    .with_context("label", label.to_string()),
            )
        })?;
        slot.push(idx);
    }
    members
        .into_iter()
        .zip(&run.thread_min_max)
        .map(|(indices, bounds)| {
            let count = indices.len();
            Ok(NestedRun {
                logl: indices.iter().map(|&idx| run.logl[idx]).collect(),
                theta: run.theta.gather(&indices, 0..run.theta.cols()),
                thread_labels: vec![0; count],
                thread_min_max: vec![*bounds],
                nlive_array: vec![1.0; count],
                output: BTreeMap::new(),
            })
        })
        .collect()
}

/// Combines single-thread runs; thread `i` of the result is `threads[i]`.
///
/// Samples are stably sorted by log-likelihood. A thread born on a finite
/// contour adds a live point after the sample with that log-likelihood. If no
/// sample matches, the sample with the nearest log-likelihood is used. If
/// several match (as in bootstrap resamples), one is drawn from `rng`. Each
/// thread's last sample removes a live point after it.
pub fn combine_threads(threads: &[NestedRun], rng: &mut RngHandle) -> Result<NestedRun, NsError> {
    let ndim = threads.first().map_or(0, |thread| thread.theta.cols());
    let mut points: Vec<(f64, usize, usize)> = Vec::new();
    let mut thread_min_max = Vec::with_capacity(threads.len());
    for (label, thread) in threads.iter().enumerate() {
        check_members(thread)?;
        if thread.nthreads() != 1 || thread.is_empty() {
            return Err(NsError::Malformed(
                ErrorInfo::new("combine.not-a-thread", "input is not a single non-empty thread")
                    .with_context("input", label.to_string())
                    .with_context("nthreads", thread.nthreads().to_string())
                    .with_context("nsamples", thread.len().to_string()),
            ));
        }
        if thread.theta.cols() != ndim {
            return Err(NsError::Malformed(
                ErrorInfo::new("combine.theta-cols", "threads have differing parameter counts")
                    .with_context("input", label.to_string())
                    .with_context("expected", ndim.to_string())
                    .with_context("found", thread.theta.cols().to_string()),
            ));
        }
        thread_min_max.push(thread.thread_min_max[0]);
        points.extend(
            thread
                .logl
                .iter()
                .enumerate()
                .map(|(row, &value)| (value, label, row)),
        );
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let logl: Vec<f64> = points.iter().map(|point| point.0).collect();
    let mut change = vec![0i64; logl.len()];
    for (pos, &(_, label, row)) in points.iter().enumerate() {
        if row + 1 == threads[label].len() {
            change[pos] -= 1;
        }
    }
    for bounds in thread_min_max.iter().filter(|b| !b.starts_from_prior()) {
        change[birth_position(&logl, bounds, rng)] += 1;
    }

    let nlive_0 = thread_min_max
        .iter()
        .filter(|bounds| bounds.starts_from_prior())
        .count() as i64;
    let mut nlive_array = Vec::with_capacity(logl.len());
    let mut nlive = nlive_0;
    for step in &change {
        nlive_array.push(nlive as f64);
        nlive += step;
    }

    let mut data = Vec::with_capacity(points.len() * ndim);
    for &(_, label, row) in &points {
        data.extend_from_slice(threads[label].theta.row(row));
    }
    Ok(NestedRun {
        theta: Matrix::from_shape_vec(points.len(), ndim, data)?,
        thread_labels: points.iter().map(|point| point.1).collect(),
        logl,
        thread_min_max,
        nlive_array,
        output: BTreeMap::new(),
    })
}

/// Merges several runs by splitting them into threads and recombining.
pub fn combine_runs(runs: &[NestedRun], rng: &mut RngHandle) -> Result<NestedRun, NsError> {
    let mut threads = Vec::new();
    for run in runs {
        threads.extend(split_threads(run)?);
    }
    combine_threads(&threads, rng)
}

fn birth_position(logl: &[f64], bounds: &ThreadBounds, rng: &mut RngHandle) -> usize {
    let matches: Vec<usize> = logl
        .iter()
        .enumerate()
        .filter(|(_, &value)| value == bounds.birth)
        .map(|(idx, _)| idx)
        .collect();
    match matches.len() {
        0 => logl
            .iter()
            .enumerate()
            .min_by(|a, b| {
                (a.1 - bounds.birth)
                    .abs()
                    .total_cmp(&(b.1 - bounds.birth).abs())
            })
            .map_or(0, |(idx, _)| idx),
        1 => matches[0],
        n => rng.pick(n).map_or(matches[0], |k| matches[k]),
    }
}
