//! Pure functions for converting cached values to and from bytes.
//!
//! Cached values are stored as JSON, which keeps them readable when
//! inspecting the cache and lets one store hold every value type.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::QueryError;

/// Serializes a value to JSON bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, QueryError> {
    serde_json::to_vec(value).map_err(|e| QueryError::Serialization(e.to_string()))
}

/// Deserializes JSON bytes into a value.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, QueryError> {
    serde_json::from_slice(bytes).map_err(|e| QueryError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{demo_events, Category, Event};

    #[test]
    fn test_events_survive_encoding() {
        let events = demo_events();

        let bytes = encode(&events).unwrap();
        let decoded: Vec<Event> = decode(&bytes).unwrap();

        assert_eq!(decoded, events);
    }

    #[test]
    fn test_decode_wrong_type_fails() {
        let bytes = encode(&vec![1, 2, 3]).unwrap();

        let result: Result<Category, _> = decode(&bytes);
        assert!(matches!(result, Err(QueryError::Serialization(_))));
    }

    #[test]
    fn test_decode_invalid_json_fails() {
        let result: Result<Vec<Event>, _> = decode(b"not json");
        assert!(matches!(result, Err(QueryError::Serialization(_))));
    }
}
