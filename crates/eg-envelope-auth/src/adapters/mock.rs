//! Failure-injecting state store.

use super::memory_store::InMemoryStateStore;
use crate::domain::errors::StoreError;
use crate::ports::outbound::StateStore;

/// `StateStore` that fails reads or writes on demand.
///
/// Delegates to an `InMemoryStateStore` while the corresponding switch is off.
#[derive(Debug, Clone, Default)]
pub struct FailingStateStore {
    inner: InMemoryStateStore,
    fail_reads: bool,
    fail_writes: bool,
}

impl FailingStateStore {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            inner: InMemoryStateStore::new(channel),
            fail_reads: false,
            fail_writes: false,
        }
    }

    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// The wrapped store, for inspecting what was written.
    pub fn inner(&self) -> &InMemoryStateStore {
        &self.inner
    }
}

impl StateStore for FailingStateStore {
    fn channel_id(&self) -> &str {
        self.inner.channel_id()
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::ReadFailed(format!("injected read failure for {key:?}")));
        }
        self.inner.get_state(key)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed(format!("injected write failure for {key:?}")));
        }
        self.inner.put_state(key, value)
    }
}
