//! Serialization of fitted transform state.
//!
//! Fitted parameters are plain data (`Vec<f64>`, column names, exponent
//! vectors) and are persisted with bincode so a later inference run can
//! reload them without re-deriving statistics.

use std::error::Error;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain data, never table handles.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}
