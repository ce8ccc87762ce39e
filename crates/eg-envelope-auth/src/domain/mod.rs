//! # Domain Layer
//!
//! Pure envelope logic: canonical encoding, signatures, replay records and
//! configuration. No ledger or clock access happens here directly; the replay
//! guard reaches state only through the `StateStore` port.

pub mod canonical;
pub mod config;
pub mod errors;
pub mod replay;
pub mod signature;
