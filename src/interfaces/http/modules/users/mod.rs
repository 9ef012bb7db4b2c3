//! Users module — user management (admin CRUD) and the selectable roles

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
