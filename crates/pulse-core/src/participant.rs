//! Participant identity
//!
//! A participant is whoever sits behind a chat client. Identity is a
//! self-chosen display name; there are no accounts. The id doubles as the
//! key of the typing registry and as the label rendered next to messages.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Validated participant identifier.
///
/// Surrounding whitespace is trimmed on construction. The trimmed value must
/// be non-empty and at most [`ParticipantId::MAX_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Maximum length in characters.
    pub const MAX_LEN: usize = 64;

    /// Create a validated participant id from raw input.
    pub fn new(raw: impl Into<String>) -> Result<Self, ParticipantIdError> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ParticipantIdError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(ParticipantIdError::TooLong);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the inner string.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Error when constructing a [`ParticipantId`] from raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParticipantIdError {
    #[error("participant id must not be empty")]
    Empty,
    #[error("participant id must be at most {} characters", ParticipantId::MAX_LEN)]
    TooLong,
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ParticipantId {
    type Err = ParticipantIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParticipantId::new(s)
    }
}

impl AsRef<str> for ParticipantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Serialize as a plain JSON string
impl Serialize for ParticipantId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

// Deserialize with validation so malformed ids never enter the domain
impl<'de> Deserialize<'de> for ParticipantId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ParticipantId::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Generate a random client id of the form `user-<suffix>`.
///
/// The client id identifies a connection (one presence slot per client),
/// while the participant id identifies the person. Two terminals with the
/// same display name share a participant id but get distinct client ids.
#[must_use]
pub fn generate_client_id() -> String {
    use rand::Rng;

    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    const SUFFIX_LEN: usize = 9;

    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();

    format!("user-{suffix}")
}
