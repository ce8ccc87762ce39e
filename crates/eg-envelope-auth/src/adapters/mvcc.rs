//! # Versioned Ledger
//!
//! Simulate-then-commit execution with multi-version concurrency control.
//!
//! A `TxSimulation` reads committed state and buffers its own writes. Every
//! read records the version it observed (`None` for an absent key). At commit
//! the ledger rejects the read/write set if any recorded version no longer
//! matches, which is what turns two concurrent "fresh" replay checks into one
//! success and one `MvccReadConflict`.

use crate::domain::errors::{CommitError, StoreError};
use crate::ports::outbound::StateStore;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

/// A committed value and the commit that last wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: u64,
}

/// Reads and writes produced by one simulated transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadWriteSet {
    /// Key to the version observed during simulation.
    pub reads: BTreeMap<String, Option<u64>>,
    /// Buffered writes, applied only on successful commit.
    pub writes: BTreeMap<String, Vec<u8>>,
}

/// In-memory ledger with versioned keys.
#[derive(Debug)]
pub struct VersionedLedger {
    channel: String,
    state: RwLock<LedgerState>,
}

#[derive(Debug, Default)]
struct LedgerState {
    entries: HashMap<String, VersionedValue>,
    height: u64,
}

impl VersionedLedger {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            state: RwLock::new(LedgerState::default()),
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel
    }

    /// Start simulating a transaction against current committed state.
    pub fn simulate(&self) -> TxSimulation<'_> {
        TxSimulation {
            ledger: self,
            reads: RefCell::new(BTreeMap::new()),
            writes: BTreeMap::new(),
        }
    }

    /// Validate and apply a read/write set. Returns the new ledger height.
    ///
    /// # Errors
    /// * `CommitError::MvccReadConflict` - a key read during simulation has
    ///   been written since; nothing is applied
    pub fn commit(&self, rwset: ReadWriteSet) -> Result<u64, CommitError> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;

        for (key, observed) in &rwset.reads {
            let current = state.entries.get(key).map(|v| v.version);
            if current != *observed {
                return Err(CommitError::MvccReadConflict { key: key.clone() });
            }
        }

        state.height += 1;
        let version = state.height;
        for (key, value) in rwset.writes {
            state.entries.insert(key, VersionedValue { value, version });
        }
        Ok(version)
    }

    /// Committed value of `key`.
    pub fn get_committed(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.entries.get(key).map(|v| v.value.clone()))
    }

    /// Version of the commit that last wrote `key`.
    pub fn version(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.entries.get(key).map(|v| v.version))
    }

    /// Number of commits applied so far.
    pub fn height(&self) -> Result<u64, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.height)
    }
}

/// One transaction being simulated against a `VersionedLedger`.
///
/// Reads see the transaction's own buffered writes first.
#[derive(Debug)]
pub struct TxSimulation<'l> {
    ledger: &'l VersionedLedger,
    reads: RefCell<BTreeMap<String, Option<u64>>>,
    writes: BTreeMap<String, Vec<u8>>,
}

impl TxSimulation<'_> {
    /// Finish simulation and hand back the read/write set.
    pub fn into_rwset(self) -> ReadWriteSet {
        ReadWriteSet {
            reads: self.reads.into_inner(),
            writes: self.writes,
        }
    }

    /// Finish simulation and commit to the ledger it was started from.
    pub fn commit(self) -> Result<u64, CommitError> {
        let ledger = self.ledger;
        ledger.commit(self.into_rwset())
    }
}

impl StateStore for TxSimulation<'_> {
    fn channel_id(&self) -> &str {
        self.ledger.channel_id()
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(value) = self.writes.get(key) {
            return Ok(Some(value.clone()));
        }

        let state = self
            .ledger
            .state
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let entry = state.entries.get(key);
        self.reads
            .borrow_mut()
            .entry(key.to_string())
            .or_insert_with(|| entry.map(|v| v.version));
        Ok(entry.map(|v| v.value.clone()))
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.writes.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
