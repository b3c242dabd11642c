//! Core types shared across WikiSync facilities
//!
//! This crate provides foundational types used by both the error and
//! logging facilities and the sync engine:
//!
//! - **Correlation types**: CycleId, SessionId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{CycleId, SessionId};
