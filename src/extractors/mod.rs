//! Request extractors that reject with the crate's validation error shape.

mod body;
mod params;
pub use body::JsonBody;
pub use params::{IdPath, Pagination};
