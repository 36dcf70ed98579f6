//! `shelflife-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no timers).

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use value_object::ValueObject;
