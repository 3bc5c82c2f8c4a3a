//! `franchise-core`: shared building blocks for the franchise network.
//!
//! This crate contains **pure** primitives (no transport or storage concerns).

pub mod clock;
pub mod error;
pub mod id;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{DomainError, DomainResult};
pub use id::{FranchiseeId, UserId};
