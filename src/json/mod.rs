//! JSON theme descriptor patching.

pub mod variation;

pub use variation::{ensure_valid, upsert_variation, VariationEntry, VariationObject};
