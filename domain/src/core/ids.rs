//! Identifier newtypes
//!
//! The store hands out opaque string keys. Wrapping them keeps a nomination id
//! from being passed where a voter id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

define_id!(
    /// Movie-night event
    EventId
);
define_id!(
    /// A nomination on an event's ballot
    NominationId
);
define_id!(
    /// A catalogue movie
    MovieId
);
define_id!(
    /// A person (voter, nominator, attendee)
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_as_str() {
        let id = NominationId::new("nom-1");
        assert_eq!(id.as_str(), "nom-1");
        assert_eq!(id.to_string(), "nom-1");
    }

    #[test]
    fn test_serde_transparent() {
        let id = UserId::from("u-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"u-42\"");

        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
