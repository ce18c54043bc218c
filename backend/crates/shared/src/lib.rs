//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate holds the vocabulary every other crate agrees on:
//! - The outward error shape ([`error::app_error::AppError`]) and its classification
//! - Typed UUID identifiers ([`id::Id`])
//!
//! Anything specific to authentication lives in the `auth` crate.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
