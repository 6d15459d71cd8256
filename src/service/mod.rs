//! Resource logic on top of the store, plus request validation.

mod items;
mod users;
mod validation;
pub use items::ItemService;
pub use users::UserService;
pub use validation::{is_valid_email, normalize_email, FieldKind, FieldRule, RequestValidator};
