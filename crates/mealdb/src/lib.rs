mod api;
mod cache;
pub mod ingredient;
mod query;

pub use api::*;
pub use cache::*;
pub use query::*;
