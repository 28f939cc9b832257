#![deny(missing_docs)]

//! Thread reconstruction and structural validation for nested-sampling runs.
//!
//! Raw sampler output (`[params..., logl, birth_logl]` rows) flows through
//! [`normalize_samples`], [`threads_given_birth_contours`] and
//! [`assemble_run`] into a [`NestedRun`], which [`check_run`] validates.

mod assemble;
mod check;
mod combine;
mod config;
pub mod dummy;
mod logx;
mod matrix;
mod normalize;
mod process;
mod run;
mod serialization;
mod threads;

pub use assemble::assemble_run;
pub use check::{
    check_logls, check_members, check_run, check_threads, CheckReport, DuplicateGroup,
    DuplicateLogls,
};
pub use combine::{combine_runs, combine_threads, split_threads};
pub use config::CheckConfig;
pub use logx::{logx_expected, logx_simulated};
pub use matrix::Matrix;
pub use normalize::normalize_samples;
pub use process::{process_samples, process_samples_array};
pub use run::{NestedRun, NormalizedSamples, ThreadBounds};
pub use serialization::{run_from_json, run_to_json};
pub use threads::{
    thread_start_contours, threads_given_birth_contours, ContourIndex, ThreadStart,
};
