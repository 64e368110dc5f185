//! Pure functions for serializing/deserializing cached collections to/from bytes.
//!
//! JSON keeps cache values human-readable and easy to inspect.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CacheError, Result};

/// Serializes a collection to JSON bytes.
pub fn serialize_collection<T: Serialize>(items: &[T]) -> Result<Vec<u8>> {
    serde_json::to_vec(items).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Deserializes JSON bytes to a collection.
pub fn deserialize_collection<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    serde_json::from_slice(bytes).map_err(|e| CacheError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AttendanceType, Category, EventAttendee};
    use uuid::Uuid;

    #[test]
    fn test_collection_survives_cache() {
        let categories = vec![
            Category::new(Uuid::new_v4(), "Finance"),
            Category::new(Uuid::new_v4(), "Legal"),
        ];

        let bytes = serialize_collection(&categories).expect("serialize should succeed");
        let cached: Vec<Category> =
            deserialize_collection(&bytes).expect("deserialize should succeed");

        assert_eq!(cached, categories);
    }

    #[test]
    fn test_empty_collection() {
        let attendees: Vec<EventAttendee> = vec![];
        let bytes = serialize_collection(&attendees).expect("serialize should succeed");
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn test_attendance_type_is_preserved() {
        let attendees = vec![EventAttendee {
            event_id: Uuid::nil(),
            participant_id: Uuid::nil(),
            attendance_type: AttendanceType::Online,
        }];
        let bytes = serialize_collection(&attendees).expect("serialize should succeed");
        assert!(String::from_utf8_lossy(&bytes).contains("\"online\""));
    }

    #[test]
    fn test_deserialize_malformed_bytes() {
        let result: Result<Vec<Category>> = deserialize_collection(b"{\"invalid\": true}");
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }
}
