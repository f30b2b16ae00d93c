//! Branded ID newtypes.
//!
//! Room, user, and message identifiers are server-assigned opaque strings.
//! Wrapping them keeps a `RoomId` from ever being passed where a `UserId`
//! is expected.

use serde::{Deserialize, Serialize};

macro_rules! branded_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// The raw string form.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

branded_id! {
    /// Identifier of a game room, assigned by the server on pairing.
    RoomId
}

branded_id! {
    /// Canonical participant identity.
    ///
    /// This is the one identity threaded through the session store and
    /// every sub-protocol controller; there is no secondary
    /// connection-level identity to reconcile against.
    UserId
}

branded_id! {
    /// Identifier of a chat message.
    MessageId
}

impl MessageId {
    /// Generate a fresh random message ID (for locally authored messages).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_is_transparent() {
        let id = RoomId::new("room-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"room-7\"");
        let back: RoomId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_matches_raw() {
        let id = UserId::from("u-42");
        assert_eq!(id.to_string(), "u-42");
        assert_eq!(id.as_str(), "u-42");
    }

    #[test]
    fn generated_message_ids_are_unique() {
        let a = MessageId::generate();
        let b = MessageId::generate();
        assert_ne!(a, b);
    }
}
