//! Core data models for map analysis.

mod analysis;
mod ids;
mod maps;
mod match_data;

pub use analysis::*;
pub use ids::*;
pub use maps::*;
pub use match_data::*;
