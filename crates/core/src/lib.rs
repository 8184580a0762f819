//! `kinit-core`: shared building blocks for the admin console.
//!
//! This crate contains **pure** primitives (no transport, no storage).

pub mod entity;
pub mod error;
pub mod id;
pub mod status;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::EntityId;
pub use status::Status;
