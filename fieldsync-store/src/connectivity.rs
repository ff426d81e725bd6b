//! Connectivity state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the remote store is reachable.
///
/// Mutated only from the host environment's connectivity signal; every
/// mutation and read consults it before choosing the local or remote path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityState {
    Online,
    Offline,
}

impl ConnectivityState {
    /// Returns true when online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}
