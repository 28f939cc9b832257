//! Recovery of thread identity from `(logl, birth_logl)` pairs.
//!
//! Every sample was drawn from inside the contour of the sample it replaced,
//! so `birth_logl[i]` is the log-likelihood of its predecessor. Matching
//! birth contours against log-likelihood values turns the flat sample stream
//! into a forest whose roots are the samples drawn from the whole prior.

use std::collections::HashMap;

use nst_core::errors::{ErrorInfo, NsError};
use serde::{Deserialize, Serialize};

/// Bijection from log-likelihood value to sample index.
///
/// Values are keyed on their bit pattern (with `-0.0` folded onto `0.0`), so
/// lookups are exact float equality. Building the index fails if two samples
/// share a log-likelihood.
#[derive(Debug, Clone)]
pub struct ContourIndex {
    by_bits: HashMap<u64, usize>,
}

impl ContourIndex {
    /// Indexes `logl`, rejecting repeated values.
    pub fn build(logl: &[f64]) -> Result<Self, NsError> {
        let mut by_bits = HashMap::with_capacity(logl.len());
        for (idx, &value) in logl.iter().enumerate() {
            if let Some(previous) = by_bits.insert(contour_key(value), idx) {
                return Err(NsError::Precision(
                    ErrorInfo::new(
                        "threads.duplicate-logl",
                        "two samples share a log-likelihood value",
                    )
                    .with_value("value", value)
                    .with_context("first_index", previous.to_string())
                    .with_context("second_index", idx.to_string())
                    .with_hint("limited output precision can merge distinct likelihoods"),
                ));
            }
        }
        Ok(Self { by_bits })
    }

    /// Index of the sample whose log-likelihood equals `contour` exactly.
    pub fn get(&self, contour: f64) -> Option<usize> {
        self.by_bits.get(&contour_key(contour)).copied()
    }

    /// Number of indexed samples.
    pub fn len(&self) -> usize {
        self.by_bits.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.by_bits.is_empty()
    }
}

fn contour_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// A contour on which one or more threads began.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreadStart {
    /// Contour value (the run's initial birth contour for prior starts).
    pub contour: f64,
    /// Number of threads that began on the contour.
    pub starts: usize,
}

/// Successor structure over sample indices.
///
/// `children[p]` lists, in array order, the samples born on the contour of
/// sample `p`. `roots` lists the samples born on the initial contour.
#[derive(Debug, Clone)]
struct BirthForest {
    init_birth: f64,
    roots: Vec<usize>,
    children: Vec<Vec<usize>>,
}

impl BirthForest {
    fn build(logl: &[f64], birth_logl: &[f64]) -> Result<Self, NsError> {
        if logl.len() != birth_logl.len() {
            return Err(NsError::Malformed(
                ErrorInfo::new("threads.length-mismatch", "logl and birth_logl differ in length")
                    .with_context("logl", logl.len().to_string())
                    .with_context("birth_logl", birth_logl.len().to_string()),
            ));
        }
        let init_birth = birth_logl.first().copied().unwrap_or(f64::NEG_INFINITY);
        for (idx, (&value, &birth)) in logl.iter().zip(birth_logl).enumerate() {
            if !(birth < value) {
                return Err(NsError::Reconstruction(
                    ErrorInfo::new(
                        "threads.birth-above-logl",
                        "a sample was born on or above its own likelihood",
                    )
                    .with_context("index", idx.to_string())
                    .with_value("logl", value)
                    .with_value("birth_logl", birth),
                ));
            }
        }

        let index = ContourIndex::build(logl)?;
        let mut roots = Vec::new();
        let mut children = vec![Vec::new(); logl.len()];
        for (idx, &birth) in birth_logl.iter().enumerate() {
            if birth == init_birth {
                roots.push(idx);
                continue;
            }
            let parent = index.get(birth).ok_or_else(|| {
                NsError::Reconstruction(
                    ErrorInfo::new(
                        "threads.unmatched-contour",
                        "birth contour matches no sample's log-likelihood",
                    )
                    .with_context("index", idx.to_string())
                    .with_value("birth_logl", birth)
                    .with_value("init_birth", init_birth),
                )
            })?;
            children[parent].push(idx);
        }
        Ok(Self {
            init_birth,
            roots,
            children,
        })
    }

    /// Samples that open a new thread, in label order.
    ///
    /// Prior starts come first in array order. Then, for every contour on which
    /// two or more samples were born (ascending), all but the first of those
    /// samples; the first continues the thread that owned the contour.
    fn thread_starts(&self) -> impl Iterator<Item = usize> + '_ {
        let splits = self
            .children
            .iter()
            .filter(|born| born.len() >= 2)
            .flat_map(|born| born[1..].iter().copied());
        self.roots.iter().copied().chain(splits)
    }

    fn start_contours(&self, logl: &[f64]) -> Vec<ThreadStart> {
        let mut starts = Vec::new();
        if !self.roots.is_empty() {
            starts.push(ThreadStart {
                contour: self.init_birth,
                starts: self.roots.len(),
            });
        }
        for (parent, born) in self.children.iter().enumerate() {
            if born.len() >= 2 {
                starts.push(ThreadStart {
                    contour: logl[parent],
                    starts: born.len() - 1,
                });
            }
        }
        starts
    }

    fn walk(&self, start: usize, label: usize, labels: &mut [Option<usize>]) -> Result<(), NsError> {
        let mut current = Some(start);
        while let Some(idx) = current {
            if let Some(existing) = labels[idx] {
                return Err(NsError::Reconstruction(
                    ErrorInfo::new("threads.relabel", "sample reached from two thread starts")
                        .with_context("index", idx.to_string())
                        .with_context("existing_label", existing.to_string())
                        .with_context("new_label", label.to_string()),
                ));
            }
            labels[idx] = Some(label);
            current = self.children[idx].first().copied();
        }
        Ok(())
    }
}

/// Assigns every sample the label of the thread it belongs to.
///
/// `logl` must be strictly increasing and `birth_logl[i] < logl[i]` must hold
/// for every sample. The birth of the first sample identifies the "whole
/// prior" contour whatever sentinel the sampler wrote. Labels are dense from
/// 0: prior-born samples open threads `0..m` in array order, then each
/// contour with `c >= 2` births opens `c - 1` further threads.
///
/// When several samples are born on the same contour, the one appearing first
/// in likelihood order continues the existing thread. This mirrors sampler
/// output only if the sampler's ordering of simultaneous births agrees with
/// likelihood order; nothing in the data can confirm it.
pub fn threads_given_birth_contours(
    logl: &[f64],
    birth_logl: &[f64],
) -> Result<Vec<usize>, NsError> {
    let forest = BirthForest::build(logl, birth_logl)?;
    let mut labels: Vec<Option<usize>> = vec![None; logl.len()];
    let mut nthreads = 0;
    for start in forest.thread_starts() {
        forest.walk(start, nthreads, &mut labels)?;
        nthreads += 1;
    }

    let unlabelled: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|(_, label)| label.is_none())
        .map(|(idx, _)| idx)
        .collect();
    if !unlabelled.is_empty() {
        let starts = forest.start_contours(logl);
        return Err(NsError::Reconstruction(
            ErrorInfo::new("threads.unreachable", "some samples were not given a thread label")
                .with_list("indices", &unlabelled)
                .with_list(
                    "start_contours",
                    &starts.iter().map(|s| s.contour).collect::<Vec<_>>(),
                )
                .with_list(
                    "start_counts",
                    &starts.iter().map(|s| s.starts).collect::<Vec<_>>(),
                ),
        ));
    }

    log::debug!(
        "reconstructed {} threads from {} samples ({} prior starts)",
        nthreads,
        logl.len(),
        forest.roots.len()
    );
    Ok(labels.into_iter().flatten().collect())
}

/// Contours on which threads began, with the number of threads opened on each.
///
/// The first entry is the initial contour; its count is the number of
/// prior-born samples (the initial live-point count for a static run).
pub fn thread_start_contours(
    logl: &[f64],
    birth_logl: &[f64],
) -> Result<Vec<ThreadStart>, NsError> {
    let forest = BirthForest::build(logl, birth_logl)?;
    Ok(forest.start_contours(logl))
}
