//! # Integration Tests
//!
//! End-to-end flows across `shared-crypto`, `shared-types` and
//! `eg-envelope-auth`.

pub mod concurrency;
pub mod flows;
