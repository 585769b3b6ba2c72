use rag_client::{Message, VectorServiceError};
use serde::{Deserialize, Serialize};

/// Last observed reachability of the vector service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityState {
    /// No health probe has completed yet.
    Unknown,
    Connected,
    Disconnected,
}

impl ConnectivityState {
    /// Display label for a status indicator.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Vector DB Status Unknown",
            Self::Connected => "Vector DB Connected",
            Self::Disconnected => "Vector DB Disconnected",
        }
    }

    #[must_use]
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// How a dispatch produces the assistant turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Ask the vector service for a retrieval-augmented response.
    Augmented,
    /// Synthesize the deterministic local reply without a remote call.
    Plain,
}

impl DispatchMode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Augmented => "augmented",
            Self::Plain => "plain",
        }
    }
}

/// Outcome of one `send_message` call. The conversation always grows by the
/// two messages carried here, whatever the backend did.
#[derive(Debug)]
pub struct MessageExchange {
    pub user: Message,
    pub assistant: Message,
    /// Present when the augmented path failed and the assistant turn is the
    /// synthesized apology notice.
    pub generation_error: Option<VectorServiceError>,
}

/// What `initialize` observed and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    pub connectivity: ConnectivityState,
    /// Entries in the knowledge cache after initialization.
    pub knowledge_entries: usize,
    /// Whether the fixed sample set was pushed because the store was empty.
    pub seeded: bool,
}
