//! Identity module — user management
//!
//! Contains the `UserAccountService` which orchestrates the user/role
//! use-cases: creating accounts, editing role membership, deleting.

pub mod service;
pub mod transaction;

pub use service::UserAccountService;
pub use transaction::{in_transaction, UowFuture};
