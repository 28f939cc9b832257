//! Structural invariant checks for [`NestedRun`] values.
//!
//! The checks never repair a run. Each failure carries a `check` context entry
//! (`members`, `logls` or `threads`) plus the offending indices and values.

use nst_core::errors::{ErrorInfo, NsError};
use serde::Serialize;

use crate::config::CheckConfig;
use crate::run::{thread_spans, NestedRun, SpanError};

/// One log-likelihood value that occurs more than once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    /// The repeated value.
    pub value: f64,
    /// Number of samples sharing it.
    pub count: usize,
    /// Positions of those samples.
    pub indices: Vec<usize>,
}

/// Diagnostic describing repeated log-likelihood values in a sorted run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateLogls {
    /// How many fewer unique values there are than samples.
    pub repeats: usize,
    /// Total number of samples.
    pub total: usize,
    /// Every repeated value in ascending order.
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicateLogls {
    /// Scans a sorted log-likelihood sequence for repeats.
    pub fn find(logl: &[f64]) -> Option<Self> {
        let mut groups = Vec::new();
        let mut start = 0;
        while start < logl.len() {
            let mut end = start + 1;
            while end < logl.len() && logl[end] == logl[start] {
                end += 1;
            }
            if end - start > 1 {
                groups.push(DuplicateGroup {
                    value: logl[start],
                    count: end - start,
                    indices: (start..end).collect(),
                });
            }
            start = end;
        }
        if groups.is_empty() {
            return None;
        }
        let repeats = groups.iter().map(|group| group.count - 1).sum();
        Some(Self {
            repeats,
            total: logl.len(),
            groups,
        })
    }

    /// Human readable summary naming values, counts and the first indices.
    pub fn message(&self) -> String {
        let values: Vec<f64> = self.groups.iter().map(|group| group.value).collect();
        let counts: Vec<usize> = self.groups.iter().map(|group| group.count).collect();
        let first = self
            .groups
            .first()
            .map(|group| group.indices.clone())
            .unwrap_or_default();
        format!(
            "# unique logl values is {} less than # points. Duplicate values: {values:?}, \
             Counts: {counts:?}, First point at inds {first:?} out of {}",
            self.repeats, self.total
        )
    }

    fn to_error_info(&self) -> ErrorInfo {
        let values: Vec<f64> = self.groups.iter().map(|group| group.value).collect();
        let counts: Vec<usize> = self.groups.iter().map(|group| group.count).collect();
        let indices: Vec<&[usize]> = self
            .groups
            .iter()
            .map(|group| group.indices.as_slice())
            .collect();
        ErrorInfo::new("logls.duplicate", self.message())
            .with_context("check", "logls")
            .with_context("repeats", self.repeats.to_string())
            .with_list("values", &values)
            .with_list("counts", &counts)
            .with_list("indices", &indices)
            .with_hint("set logl_warn_only to downgrade limited-precision repeats to a warning")
    }
}

/// Outcome of a successful [`check_run`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckReport {
    /// Number of samples checked.
    pub nsamples: usize,
    /// Number of threads checked.
    pub nthreads: usize,
    /// Repeated log-likelihoods tolerated because of relaxed mode.
    pub duplicate_logls: Option<DuplicateLogls>,
}

impl CheckReport {
    /// Whether the run passed without any tolerated warnings.
    pub fn is_clean(&self) -> bool {
        self.duplicate_logls.is_none()
    }
}

/// Runs the membership, log-likelihood and thread checks in order.
pub fn check_run(run: &NestedRun, config: &CheckConfig) -> Result<CheckReport, NsError> {
    check_members(run)?;
    let duplicate_logls = check_logls(run, config.logl_warn_only)?;
    check_threads(run)?;
    Ok(CheckReport {
        nsamples: run.len(),
        nthreads: run.nthreads(),
        duplicate_logls,
    })
}

/// Checks that every per-sample member has the shape of `logl`.
pub fn check_members(run: &NestedRun) -> Result<(), NsError> {
    let n = run.logl.len();
    if !run.theta.is_consistent() {
        return Err(NsError::Malformed(
            members_error(
                "members.theta-storage",
                "theta storage does not match its shape",
            )
            .with_context("rows", run.theta.rows().to_string())
            .with_context("cols", run.theta.cols().to_string()),
        ));
    }
    let lengths = [
        ("theta", run.theta.rows()),
        ("thread_labels", run.thread_labels.len()),
        ("nlive_array", run.nlive_array.len()),
    ];
    for (member, len) in lengths {
        if len != n {
            return Err(NsError::Malformed(
                members_error(
                    &format!("members.{member}-length"),
                    &format!("{member} length differs from logl"),
                )
                .with_context("logl", n.to_string())
                .with_context(member, len.to_string()),
            ));
        }
    }
    Ok(())
}

/// Checks that `logl` is sorted and, unless `warn_only`, free of repeats.
///
/// In relaxed mode a repeat is logged as a warning and returned as a
/// diagnostic instead of failing.
pub fn check_logls(run: &NestedRun, warn_only: bool) -> Result<Option<DuplicateLogls>, NsError> {
    if let Some(idx) = run.logl.windows(2).position(|pair| !(pair[0] <= pair[1])) {
        return Err(NsError::Malformed(
            ErrorInfo::new("logls.unsorted", "logl is not in ascending order")
                .with_context("check", "logls")
                .with_context("index", idx.to_string())
                .with_value("value", run.logl[idx])
                .with_value("next_value", run.logl[idx + 1]),
        ));
    }
    let Some(duplicates) = DuplicateLogls::find(&run.logl) else {
        return Ok(None);
    };
    if !warn_only {
        return Err(NsError::Precision(duplicates.to_error_info()));
    }
    log::warn!("{}", duplicates.message());
    Ok(Some(duplicates))
}

/// Checks thread labels against `thread_min_max`.
///
/// Labels must cover exactly `0..thread_min_max.len()`, at least one thread
/// must start from the prior, and each thread's first sample must lie above
/// its birth contour while its last sample equals its recorded final value.
pub fn check_threads(run: &NestedRun) -> Result<(), NsError> {
    let spans = thread_spans(&run.thread_labels, run.nthreads()).map_err(|err| match err {
        SpanError::OutOfRange { index, label } => threads_error(
            "threads.label-out-of-range",
            "thread label has no thread_min_max entry",
        )
        .with_context("index", index.to_string())
        .with_context("label", label.to_string())
        .with_context("nthreads", run.nthreads().to_string()),
        SpanError::Missing { label } => threads_error(
            "threads.labels-not-dense",
            "thread_min_max entry has no samples",
        )
        .with_context("label", label.to_string())
        .with_context("nthreads", run.nthreads().to_string()),
    })
    .map_err(NsError::Reconstruction)?;

    if !run
        .thread_min_max
        .iter()
        .any(|bounds| bounds.starts_from_prior())
    {
        return Err(NsError::Reconstruction(
            threads_error(
                "threads.no-prior-thread",
                "run should have at least one thread which starts by sampling the whole prior",
            )
            .with_context("nthreads", run.nthreads().to_string()),
        ));
    }

    for (label, (span, bounds)) in spans.iter().zip(&run.thread_min_max).enumerate() {
        let first = run.logl[span.first];
        let last = run.logl[span.last];
        if !(bounds.birth < first) {
            return Err(NsError::Reconstruction(
                threads_error(
                    "threads.birth-not-below-first",
                    "first point in thread has logl not above the thread birth contour",
                )
                .with_context("label", label.to_string())
                .with_context("index", span.first.to_string())
                .with_value("logl", first)
                .with_value("birth", bounds.birth),
            ));
        }
        if bounds.last != last {
            return Err(NsError::Reconstruction(
                threads_error(
                    "threads.last-mismatch",
                    "last point in thread logl differs from the thread end logl",
                )
                .with_context("label", label.to_string())
                .with_context("index", span.last.to_string())
                .with_value("logl", last)
                .with_value("recorded_last", bounds.last),
            ));
        }
    }
    Ok(())
}

fn members_error(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message).with_context("check", "members")
}

fn threads_error(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message).with_context("check", "threads")
}
