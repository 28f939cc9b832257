use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::matrix::Matrix;
use crate::serialization::contour;

/// Birth contour and final log-likelihood of a single thread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThreadBounds {
    /// Contour the thread's first sample was drawn from; `-inf` for threads
    /// that started by sampling the whole prior.
    #[serde(with = "contour")]
    pub birth: f64,
    /// Log-likelihood of the thread's last sample.
    pub last: f64,
}

impl ThreadBounds {
    /// Whether the thread started by sampling the unconstrained prior.
    pub fn starts_from_prior(&self) -> bool {
        self.birth == f64::NEG_INFINITY
    }
}

/// Reconstructed nested-sampling run.
///
/// Samples are stored in ascending log-likelihood order. Every per-sample
/// member is aligned by index with `logl`; `thread_min_max[t]` describes the
/// thread labelled `t`. Runs are read-only once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NestedRun {
    /// Log-likelihood of each sample.
    pub logl: Vec<f64>,
    /// Parameter values, one row per sample.
    pub theta: Matrix,
    /// Thread each sample belongs to.
    pub thread_labels: Vec<usize>,
    /// Birth contour and final log-likelihood per thread label.
    pub thread_min_max: Vec<ThreadBounds>,
    /// Number of live points between the previous sample and this one.
    pub nlive_array: Vec<f64>,
    /// Free-form metadata (origin file names, sampler statistics).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub output: BTreeMap<String, Value>,
}

impl NestedRun {
    /// Number of samples in the run.
    pub fn len(&self) -> usize {
        self.logl.len()
    }

    /// Whether the run holds no samples.
    pub fn is_empty(&self) -> bool {
        self.logl.is_empty()
    }

    /// Number of threads recorded in `thread_min_max`.
    pub fn nthreads(&self) -> usize {
        self.thread_min_max.len()
    }

    /// Sample indices belonging to `label`, in ascending log-likelihood order.
    pub fn thread_indices(&self, label: usize) -> Vec<usize> {
        self.thread_labels
            .iter()
            .enumerate()
            .filter(|(_, &lab)| lab == label)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Attaches an entry to the free-form `output` metadata.
    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.output.insert(key.into(), value.into());
        self
    }
}

/// Sample columns after sorting by log-likelihood.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSamples {
    /// Parameter values, one row per sample.
    pub theta: Matrix,
    /// Log-likelihoods in ascending order.
    pub logl: Vec<f64>,
    /// Contour each sample was born on, aligned with `logl`.
    pub birth_logl: Vec<f64>,
}

impl NormalizedSamples {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.logl.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.logl.is_empty()
    }

    /// The contour identifying "sampled from the whole prior": the birth of the
    /// lowest-likelihood sample.
    pub fn init_birth(&self) -> Option<f64> {
        self.birth_logl.first().copied()
    }
}

/// Positions of a thread's first and last samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ThreadSpan {
    pub first: usize,
    pub last: usize,
}

/// Why thread labels could not be mapped onto spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpanError {
    /// A sample carries a label outside `0..nthreads`.
    OutOfRange { index: usize, label: usize },
    /// A label in `0..nthreads` has no samples.
    Missing { label: usize },
}

/// Maps dense labels `0..nthreads` to their first and last sample positions.
pub(crate) fn thread_spans(labels: &[usize], nthreads: usize) -> Result<Vec<ThreadSpan>, SpanError> {
    let mut spans: Vec<Option<ThreadSpan>> = vec![None; nthreads];
    for (index, &label) in labels.iter().enumerate() {
        let slot = spans
            .get_mut(label)
            .ok_or(SpanError::OutOfRange { index, label })?;
        let span = slot.get_or_insert(ThreadSpan {
            first: index,
            last: index,
        });
        span.last = index;
    }
    spans
        .into_iter()
        .enumerate()
        .map(|(label, span)| span.ok_or(SpanError::Missing { label }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_track_first_and_last() {
        let spans = thread_spans(&[0, 1, 0, 1, 1, 2], 3).unwrap();
        assert_eq!(spans[0], ThreadSpan { first: 0, last: 2 });
        assert_eq!(spans[1], ThreadSpan { first: 1, last: 4 });
        assert_eq!(spans[2], ThreadSpan { first: 5, last: 5 });
    }

    #[test]
    fn spans_report_gaps() {
        assert_eq!(
            thread_spans(&[0, 2], 3),
            Err(SpanError::Missing { label: 1 })
        );
        assert_eq!(
            thread_spans(&[0, 3], 2),
            Err(SpanError::OutOfRange { index: 1, label: 3 })
        );
    }
}
