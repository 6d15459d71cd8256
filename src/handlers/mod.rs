//! HTTP handlers for items, users, and service health.

pub mod health;
pub mod items;
pub mod users;
