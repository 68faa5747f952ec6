//! Domain types and DTOs
//!
//! Entities persisted by the bid store plus the wire shapes accepted and
//! returned by the API.

pub mod bids;
pub mod users;

pub use bids::*;
pub use users::*;
