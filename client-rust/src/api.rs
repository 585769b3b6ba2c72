use serde::{Deserialize, Serialize};

use crate::{
    ConversationMatch, KnowledgeEntry, KnowledgeItem, KnowledgeMatch, KnowledgeMetadata, Message,
};

// Request and response bodies for the /api/* routes of the vector service.

#[derive(Debug, Serialize)]
pub struct KnowledgePayload<'a> {
    pub text: &'a str,
    pub metadata: &'a KnowledgeMetadata,
}

#[derive(Debug, Serialize)]
pub struct BatchAddRequest<'a> {
    pub items: &'a [KnowledgeItem],
}

#[derive(Debug, Serialize)]
pub struct SaveConversationRequest<'a> {
    pub conversation_id: &'a str,
    pub messages: &'a [Message],
}

#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub k: usize,
}

#[derive(Debug, Serialize)]
pub struct GenerateRagRequest<'a> {
    pub query: &'a str,
    pub conversation_history: &'a [Message],
}

/// Every mutating route wraps its outcome in a `success` flag even though the
/// status code already says so. A false flag under a 2xx is a contract
/// violation.
#[derive(Debug, Deserialize)]
pub struct Ack {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddKnowledgeResponse {
    pub success: bool,
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchAddResponse {
    pub success: bool,
    pub added_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct KnowledgeVectorsResponse {
    pub vectors: Vec<KnowledgeEntry>,
}

#[derive(Debug, Deserialize)]
pub struct KnowledgeSearchResponse {
    #[serde(default)]
    pub results: Vec<KnowledgeMatch>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationSearchResponse {
    #[serde(default)]
    pub results: Vec<ConversationMatch>,
}
