//! Normalized result schema shared by all source adapters

mod types;

pub use types::*;
