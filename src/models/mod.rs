//! Inbound and outbound shapes for items and users.

mod item;
mod user;

pub use item::{Item, ItemCreate, ItemUpdate};
pub use user::{User, UserCreate};

use serde::{Deserialize, Deserializer};

/// Distinguishes an explicit `null` from an absent field: absent stays `None`
/// (via `#[serde(default)]`), present becomes `Some(value_or_none)`.
pub(crate) fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

pub(crate) fn default_true() -> bool {
    true
}
