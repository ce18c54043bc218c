//! Value Object Module

pub mod chirp_body;
pub mod email;

pub use kernel::id::{ChirpId, UserId};
