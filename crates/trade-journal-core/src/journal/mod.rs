pub mod filter;
pub mod normalizer;
#[cfg(feature = "sizing")]
pub mod sizing;
pub mod trade;
