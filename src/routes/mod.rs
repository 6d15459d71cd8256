//! Routers per resource. Collection paths accept an optional trailing slash.

mod common;
mod items;
mod users;
pub use common::common_routes;
pub use items::item_routes;
pub use users::user_routes;
