use nst_core::errors::{ErrorInfo, NsError};

use crate::matrix::Matrix;
use crate::run::NormalizedSamples;

/// Sorts raw sample rows by log-likelihood and splits them into columns.
///
/// Each row of `samples` is `[param_1, ..., param_d, logl, birth_logl]`. Rows
/// are stably sorted by the `logl` column (ties keep their input order) and
/// the result holds `theta` (the first `d` columns), `logl` and `birth_logl`.
/// Duplicate log-likelihoods are not rejected here; reconstruction and the
/// validator report them. An empty sample set is accepted only when it still
/// declares its columns (see [`Matrix::empty`]).
pub fn normalize_samples(samples: &Matrix) -> Result<NormalizedSamples, NsError> {
    if !samples.is_consistent() {
        return Err(NsError::Malformed(
            ErrorInfo::new("normalize.storage", "samples storage does not match its shape")
                .with_context("rows", samples.rows().to_string())
                .with_context("cols", samples.cols().to_string()),
        ));
    }
    let cols = samples.cols();
    if cols < 3 {
        return Err(NsError::Malformed(
            ErrorInfo::new(
                "normalize.columns",
                "samples need at least one parameter column plus logl and birth_logl",
            )
            .with_context("cols", cols.to_string()),
        ));
    }
    let logl_col = cols - 2;
    let birth_col = cols - 1;

    let mut order: Vec<usize> = (0..samples.rows()).collect();
    order.sort_by(|&a, &b| samples.row(a)[logl_col].total_cmp(&samples.row(b)[logl_col]));

    let theta = samples.gather(&order, 0..logl_col);
    let logl = order.iter().map(|&idx| samples.row(idx)[logl_col]).collect();
    let birth_logl = order
        .iter()
        .map(|&idx| samples.row(idx)[birth_col])
        .collect();

    Ok(NormalizedSamples {
        theta,
        logl,
        birth_logl,
    })
}
