use crate::domain::config::SerializationTarget;
use crate::domain::errors::SerializationError;
use crate::ports::outbound::EnvelopeSerializer;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Envelope serializer backed by `serde_json` or `bincode`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenericSerializer {
    target: SerializationTarget,
}

impl GenericSerializer {
    pub fn new(target: SerializationTarget) -> Self {
        Self { target }
    }

    pub fn json() -> Self {
        Self::new(SerializationTarget::Json)
    }

    pub fn binary() -> Self {
        Self::new(SerializationTarget::Binary)
    }

    pub fn target(&self) -> SerializationTarget {
        self.target
    }
}

impl EnvelopeSerializer for GenericSerializer {
    fn from_bytes<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, SerializationError> {
        match self.target {
            SerializationTarget::Json => {
                serde_json::from_slice(data).map_err(|e| SerializationError::new(e.to_string()))
            }
            SerializationTarget::Binary => {
                bincode::deserialize(data).map_err(|e| SerializationError::new(e.to_string()))
            }
        }
    }

    fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, SerializationError> {
        match self.target {
            SerializationTarget::Json => {
                serde_json::to_vec(value).map_err(|e| SerializationError::new(e.to_string()))
            }
            SerializationTarget::Binary => {
                bincode::serialize(value).map_err(|e| SerializationError::new(e.to_string()))
            }
        }
    }
}
