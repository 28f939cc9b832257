use std::collections::BTreeMap;

use nst_core::errors::{ErrorInfo, NsError};

use crate::run::{thread_spans, NestedRun, NormalizedSamples, SpanError, ThreadBounds};
use crate::threads::ContourIndex;

/// Packages normalized samples and their thread labels into a [`NestedRun`].
///
/// Each thread's final log-likelihood is that of its last sample. Its birth is
/// `-inf` when its first sample was born on the run's initial contour and the
/// literal birth contour otherwise. The live-point count is the running sum of
/// a delta array offset by one from sample positions: slot 0 holds the threads
/// sampled from the prior, a thread born on sample `b` adds one at `b + 1`, and
/// a thread ending on sample `e` removes one at `e + 1`.
pub fn assemble_run(normalized: NormalizedSamples, labels: Vec<usize>) -> Result<NestedRun, NsError> {
    let init_birth = normalized.init_birth().unwrap_or(f64::NEG_INFINITY);
    let NormalizedSamples {
        theta,
        logl,
        birth_logl,
    } = normalized;
    let n = logl.len();
    if labels.len() != n || birth_logl.len() != n || theta.rows() != n {
        return Err(NsError::Malformed(
            ErrorInfo::new("assemble.length-mismatch", "sample columns differ in length")
                .with_context("logl", n.to_string())
                .with_context("birth_logl", birth_logl.len().to_string())
                .with_context("theta_rows", theta.rows().to_string())
                .with_context("labels", labels.len().to_string()),
        ));
    }

    if let Some(index) = labels.iter().position(|&label| label >= n) {
        return Err(NsError::Reconstruction(
            ErrorInfo::new("assemble.labels-not-dense", "thread label exceeds the sample count")
                .with_context("index", index.to_string())
                .with_context("label", labels[index].to_string())
                .with_context("nsamples", n.to_string()),
        ));
    }
    let nthreads = labels.iter().max().map_or(0, |max| max + 1);
    let spans = thread_spans(&labels, nthreads).map_err(|err| {
        let info = ErrorInfo::new("assemble.labels-not-dense", "thread labels skip a value");
        let info = match err {
            SpanError::Missing { label } => info.with_context("missing_label", label.to_string()),
            SpanError::OutOfRange { index, label } => info
                .with_context("index", index.to_string())
                .with_context("label", label.to_string()),
        };
        NsError::Reconstruction(info)
    })?;

    let index = ContourIndex::build(&logl)?;
    let mut delta = vec![0i64; n + 1];
    let mut thread_min_max = Vec::with_capacity(nthreads);
    for (label, span) in spans.iter().enumerate() {
        delta[span.last + 1] -= 1;
        let birth = birth_logl[span.first];
        if birth == init_birth {
            delta[0] += 1;
            thread_min_max.push(ThreadBounds {
                birth: f64::NEG_INFINITY,
                last: logl[span.last],
            });
        } else {
            let birth_index = index.get(birth).ok_or_else(|| {
                NsError::Reconstruction(
                    ErrorInfo::new(
                        "assemble.unmatched-birth",
                        "thread birth contour matches no sample",
                    )
                    .with_context("label", label.to_string())
                    .with_value("birth_logl", birth),
                )
            })?;
            delta[birth_index + 1] += 1;
            thread_min_max.push(ThreadBounds {
                birth,
                last: logl[span.last],
            });
        }
    }

    let mut nlive_array = Vec::with_capacity(n);
    let mut nlive = 0i64;
    for (idx, step) in delta[..n].iter().enumerate() {
        nlive += step;
        if nlive < 0 {
            return Err(NsError::Reconstruction(
                ErrorInfo::new("assemble.negative-nlive", "live point count dropped below zero")
                    .with_context("index", idx.to_string())
                    .with_context("nlive", nlive.to_string()),
            ));
        }
        nlive_array.push(nlive as f64);
    }

    Ok(NestedRun {
        logl,
        theta,
        thread_labels: labels,
        thread_min_max,
        nlive_array,
        output: BTreeMap::new(),
    })
}
