use nst_core::errors::NsError;

use crate::assemble::assemble_run;
use crate::check::{check_run, CheckReport};
use crate::config::CheckConfig;
use crate::matrix::Matrix;
use crate::normalize::normalize_samples;
use crate::run::NestedRun;
use crate::threads::threads_given_birth_contours;

/// Converts an array of dead points (plus any live points remaining at
/// termination) into a [`NestedRun`].
///
/// Rows are `[param_1, ..., param_d, logl, birth_logl]`. Repeated
/// log-likelihoods are always fatal here because thread reconstruction keys
/// contours on exact values.
pub fn process_samples_array(samples: &Matrix) -> Result<NestedRun, NsError> {
    let normalized = normalize_samples(samples)?;
    let labels = threads_given_birth_contours(&normalized.logl, &normalized.birth_logl)?;
    assemble_run(normalized, labels)
}

/// [`process_samples_array`] followed by [`check_run`].
pub fn process_samples(
    samples: &Matrix,
    config: &CheckConfig,
) -> Result<(NestedRun, CheckReport), NsError> {
    let run = process_samples_array(samples)?;
    let report = check_run(&run, config)?;
    Ok((run, report))
}
