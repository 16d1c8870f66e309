//! Strongly-typed identifiers.
//!
//! Flow documents and transports hand us opaque string keys (block ids,
//! session ids); those are wrapped as-is. Identifiers minted by chatflow
//! itself use ULID, providing both uniqueness and temporal ordering.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to generate a strongly-typed wrapper around an externally supplied
/// string key.
macro_rules! define_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a key from any string-like value.
            #[must_use]
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Returns the key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the key is the empty string.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consumes the key, returning the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

/// Macro to generate a strongly-typed ID wrapper around ULID.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Creates a new ID with a randomly generated ULID.
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            /// Creates an ID from a ULID.
            #[must_use]
            pub const fn from_ulid(ulid: Ulid) -> Self {
                Self(ulid)
            }

            /// Returns the underlying ULID.
            #[must_use]
            pub const fn as_ulid(&self) -> Ulid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let prefix_with_underscore = concat!($prefix, "_");
                let ulid_str = s.strip_prefix(prefix_with_underscore).unwrap_or(s);

                Ulid::from_str(ulid_str)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        reason: e.to_string(),
                    })
            }
        }
    };
}

define_key!(
    /// Identifier of a block, unique within a single flow document.
    BlockId
);

define_key!(
    /// Opaque session identifier supplied by the transport layer.
    SessionId
);

define_id!(
    /// Unique identifier for a transcript entry.
    MessageId,
    "msg"
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn block_id_displays_raw_key() {
        let id = BlockId::from("greeting");
        assert_eq!(id.to_string(), "greeting");
        assert_eq!(id, "greeting");
    }

    #[test]
    fn session_id_empty_detection() {
        assert!(SessionId::new("").is_empty());
        assert!(!SessionId::new("s1").is_empty());
    }

    #[test]
    fn keys_are_transparent_in_json() {
        let id = BlockId::new("wait");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"wait\"");
    }

    #[test]
    fn key_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(BlockId::new("price"), 1);
        assert_eq!(map.get("price"), Some(&1));
    }

    #[test]
    fn message_id_display_format() {
        let id = MessageId::new();
        assert!(id.to_string().starts_with("msg_"));
    }

    #[test]
    fn message_id_parses_with_and_without_prefix() {
        let id = MessageId::new();
        let with_prefix: MessageId = id.to_string().parse().expect("should parse");
        let without_prefix: MessageId = id.as_ulid().to_string().parse().expect("should parse");
        assert_eq!(id, with_prefix);
        assert_eq!(id, without_prefix);
    }

    #[test]
    fn message_id_rejects_garbage() {
        let err = "msg_nope".parse::<MessageId>().unwrap_err();
        assert_eq!(err.id_type, "MessageId");
    }
}
