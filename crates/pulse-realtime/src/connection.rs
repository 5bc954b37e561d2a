//! Connection state of the realtime provider link.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of the link to the realtime provider.
///
/// The health endpoint reports this value verbatim (lowercase), so the
/// serialized form is part of the HTTP contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Attempting to establish the subscribe stream.
    Connecting,
    /// Subscribe stream is live.
    Connected,
    /// Stream lost; a retry is pending.
    Disconnected,
    /// Repeated failures; still retrying but degraded.
    Suspended,
    /// Deliberately shut down.
    Closed,
    /// Credential rejected; no further retries.
    Failed,
}

impl ConnectionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Suspended => "suspended",
            Self::Closed => "closed",
            Self::Failed => "failed",
        }
    }

    /// Whether events currently flow to and from the provider.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Whether this state is final (no retry will leave it).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConnectionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "connecting" => Ok(Self::Connecting),
            "connected" => Ok(Self::Connected),
            "disconnected" => Ok(Self::Disconnected),
            "suspended" => Ok(Self::Suspended),
            "closed" => Ok(Self::Closed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid connection state: {s}")),
        }
    }
}
