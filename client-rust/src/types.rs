use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One turn in a conversation.
///
/// Messages are append-only: once created they are never mutated, and their
/// timestamps are non-decreasing within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Passages the service retrieved to ground this turn. Empty for user
    /// turns, for plain-mode replies, and when nothing relevant was found.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<RetrievedContext>,
    /// Marks a synthesized failure notice rather than a genuine service
    /// response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// A scalar metadata value.
///
/// The remote store only accepts flat string/number/bool metadata, so nested
/// values are unrepresentable by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    String(String),
}

/// Descriptive metadata attached to a knowledge entry: a closed set of known
/// fields plus an open extension map for anything else the service stores
/// (it injects timestamps and echo ids of its own).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, MetadataValue>,
}

/// One knowledge record mirrored from the remote store. The service is
/// authoritative; local copies are read-only snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Remote-assigned identifier.
    pub id: String,
    /// The source passage.
    pub text: String,
    #[serde(default)]
    pub metadata: KnowledgeMetadata,
}

/// A passage to add to the knowledge store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub text: String,
    #[serde(default)]
    pub metadata: KnowledgeMetadata,
}

/// A knowledge entry returned by a similarity search, ranked by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMatch {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: KnowledgeMetadata,
    pub similarity: f64,
}

/// A persisted conversation returned by a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMatch {
    pub conversation_id: String,
    /// The flattened transcript the service indexed.
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, MetadataValue>,
    pub similarity: f64,
}

/// Where a retrieved context came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Knowledge,
    Conversation,
}

/// One retrieved passage supporting a generated response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedContext {
    #[serde(rename = "type")]
    pub kind: ContextKind,
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, MetadataValue>,
    pub similarity: f64,
}

/// The service's health report.
///
/// The endpoint reports failure in-band: an unhealthy service answers with a
/// 500 whose body still parses into this type with `vector_db_connected`
/// false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    pub vector_db_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_loaded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A retrieval-augmented response: the synthesized text plus the passages it
/// was grounded on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagResponse {
    pub response: String,
    #[serde(default)]
    pub contexts: Vec<RetrievedContext>,
}
