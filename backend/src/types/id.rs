//! Typed ID wrappers for compile-time type safety.
//!
//! These types wrap the BIGSERIAL primary keys to prevent accidental mixing
//! of different entity IDs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate typed ID wrappers with common trait implementations.
macro_rules! typed_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw integer value.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(StudySessionId, "Unique identifier for a planned study session.");
typed_id!(TaskId, "Unique identifier for a task.");
typed_id!(FocusSessionId, "Unique identifier for a completed focus session.");

/// User assumed by single-user deployments when no `user_id` is supplied.
pub const DEFAULT_USER_ID: UserId = UserId(1);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_ids_do_not_compare_across_types() {
        let user = UserId(7);
        let task = TaskId(7);
        assert_eq!(user.as_i64(), task.as_i64());
        assert_eq!(user.to_string(), "7");
    }

    #[test]
    fn typed_id_serializes_as_plain_integer() {
        let json = serde_json::to_value(TaskId(42)).unwrap();
        assert_eq!(json, serde_json::json!(42));
        let back: TaskId = serde_json::from_value(json).unwrap();
        assert_eq!(back, TaskId(42));
    }
}
