#![deny(missing_docs)]
#![doc = "Shared error taxonomy and deterministic randomness for the NST crates."]

pub mod errors;
pub mod rng;

pub use errors::{ErrorInfo, NsError};
pub use rng::{derive_substream_seed, RngHandle};
