use nst_core::errors::{ErrorInfo, NsError};
use nst_core::rng::RngHandle;

/// Expected log prior volume at each sample.
///
/// Each step shrinks the volume by `-1 / nlive` in log space.
pub fn logx_expected(nlive: &[f64]) -> Result<Vec<f64>, NsError> {
    ensure_positive(nlive)?;
    Ok(cumulative(nlive.iter().map(|&n| -1.0 / n)))
}

/// One random realisation of the log prior volume at each sample.
///
/// The shrinkage at a step with `n` live points is the largest of `n` uniform
/// draws, so its logarithm is `ln(u) / n` for `u` uniform on `(0, 1)`.
pub fn logx_simulated(nlive: &[f64], rng: &mut RngHandle) -> Result<Vec<f64>, NsError> {
    ensure_positive(nlive)?;
    let steps: Vec<f64> = nlive.iter().map(|&n| rng.open_unit().ln() / n).collect();
    Ok(cumulative(steps))
}

fn ensure_positive(nlive: &[f64]) -> Result<(), NsError> {
    match nlive.iter().position(|&n| !(n > 0.0)) {
        Some(idx) => Err(NsError::Malformed(
            ErrorInfo::new("logx.nonpositive-nlive", "live point counts must be positive")
                .with_context("index", idx.to_string())
                .with_value("nlive", nlive[idx]),
        )),
        None => Ok(()),
    }
}

fn cumulative(steps: impl IntoIterator<Item = f64>) -> Vec<f64> {
    steps
        .into_iter()
        .scan(0.0, |total, step| {
            *total += step;
            Some(*total)
        })
        .collect()
}
