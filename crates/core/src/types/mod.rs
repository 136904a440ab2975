//! Core types for StoreForge.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod slug;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Cents;
pub use slug::{Slug, slugify};
pub use status::{EventType, OrderStatus, ProductKind, StatusParseError};
