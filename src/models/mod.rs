//! Data models for the placement portal.
//!
//! Field names serialize in camelCase to match the web client.

mod college;
mod company;
mod question;
mod stats;
mod user;

pub use college::*;
pub use company::*;
pub use question::*;
pub use stats::*;
pub use user::*;
