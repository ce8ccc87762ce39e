//! # Shared Types Crate
//!
//! Wire types for signed call envelopes.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: The `Envelope` shape is defined once and used by
//!   both the verifier and the clients that produce envelopes.
//! - **Positional Arguments**: Calls carry `[method, payload, envelope]`; the
//!   positions are fixed by `CallArgs`.
//! - **Envelope Authority**: After verification, `Identity` is the only source of
//!   truth for who signed a call.

pub mod entities;
pub mod envelope;

pub use entities::*;
pub use envelope::{is_zero_deadline, Envelope};
