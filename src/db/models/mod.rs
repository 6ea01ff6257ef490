//! Database models split into domain-specific modules.

pub mod book;
pub mod review;
pub mod user;

pub use book::*;
pub use review::*;
pub use user::*;
