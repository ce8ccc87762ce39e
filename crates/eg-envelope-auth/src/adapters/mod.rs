//! # Adapters
//!
//! Concrete implementations of the outbound ports.
//!
//! - `memory_store`: plain in-memory `StateStore`
//! - `mvcc`: versioned ledger with simulate/commit and read-conflict detection
//! - `serializer`: JSON and bincode envelope decoding
//! - `time`: system and fixed clocks
//! - `mock`: a `StateStore` that fails on demand

pub mod memory_store;
pub mod mock;
pub mod mvcc;
pub mod serializer;
pub mod time;

pub use memory_store::InMemoryStateStore;
pub use mock::FailingStateStore;
pub use mvcc::{ReadWriteSet, TxSimulation, VersionedLedger, VersionedValue};
pub use serializer::GenericSerializer;
pub use time::{FixedTimeSource, SystemTimeSource};
