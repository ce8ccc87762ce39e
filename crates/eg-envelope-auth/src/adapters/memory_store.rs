use crate::domain::errors::StoreError;
use crate::ports::outbound::StateStore;
use std::collections::HashMap;

/// In-memory implementation of `StateStore` for tests and single-process use.
///
/// Writes are visible immediately; there is no transaction boundary.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    channel: String,
    state: HashMap<String, Vec<u8>>,
}

impl InMemoryStateStore {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            state: HashMap::new(),
        }
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Iterate over stored keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.state.keys().map(String::as_str)
    }
}

impl StateStore for InMemoryStateStore {
    fn channel_id(&self) -> &str {
        &self.channel
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.state.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
