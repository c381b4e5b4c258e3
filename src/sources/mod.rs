//! Source adapters
//!
//! One canonical adapter per external source, all behind the common
//! `Source` contract.

mod redirect;
mod registry;
mod traits;

pub mod bing;
pub mod duckduckgo;
pub mod ecosia;
pub mod gnews;
pub mod google;
pub mod searx;
pub mod wikipedia;
pub mod yandex;
pub mod youtube;

pub use redirect::{ensure_absolute, unwrap_redirect};
pub use registry::SourceRegistry;
pub use traits::*;
