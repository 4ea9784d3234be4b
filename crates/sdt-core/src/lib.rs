#![deny(missing_docs)]
#![doc = "Core error, rational and RNG types shared by the conjoint survey design tool crates."]

pub mod errors;
pub mod rational;
pub mod rng;

pub use errors::{ErrorInfo, SdtError};
pub use rational::{Ratio, LARGE_DENOMINATOR};
pub use rng::{derive_substream_seed, RngHandle};
