//! # Ports Layer
//!
//! - `inbound`: the verification API offered to contract dispatchers
//! - `outbound`: ledger state, envelope decoding and clock dependencies

pub mod inbound;
pub mod outbound;
