//! `bistro-core`: shared building blocks for the pricing and forecasting engine.
//!
//! This crate contains **pure domain** primitives (no I/O, no persistence).

pub mod error;
pub mod fallback;
pub mod id;
pub mod menu;

pub use error::{DomainError, DomainResult};
pub use fallback::OrFallback;
pub use id::MenuItemId;
pub use menu::{CategoryClass, MenuItem};
