use crate::{
    ConversationMatch, HealthStatus, KnowledgeEntry, KnowledgeItem, KnowledgeMatch,
    KnowledgeMetadata, Message, RagResponse, VectorServiceResult,
};

/// A remote service that stores knowledge passages and conversation
/// transcripts in a vector index and generates retrieval-augmented responses
/// over them.
#[async_trait::async_trait]
pub trait VectorService: Send + Sync {
    fn provider(&self) -> &'static str;
    async fn check_health(&self) -> VectorServiceResult<HealthStatus>;
    /// Stores one passage and returns the remote-assigned id.
    async fn add_knowledge(
        &self,
        text: &str,
        metadata: &KnowledgeMetadata,
    ) -> VectorServiceResult<String>;
    /// Stores several passages in one request and returns how many were
    /// accepted.
    async fn batch_add_knowledge(&self, items: &[KnowledgeItem]) -> VectorServiceResult<usize>;
    async fn list_knowledge(&self) -> VectorServiceResult<Vec<KnowledgeEntry>>;
    async fn search_knowledge(
        &self,
        query: &str,
        k: usize,
    ) -> VectorServiceResult<Vec<KnowledgeMatch>>;
    async fn update_knowledge(
        &self,
        id: &str,
        text: &str,
        metadata: &KnowledgeMetadata,
    ) -> VectorServiceResult<()>;
    async fn delete_knowledge(&self, id: &str) -> VectorServiceResult<()>;
    /// Persists a transcript so later searches can retrieve it. Saving the
    /// same conversation id again replaces the indexed transcript.
    async fn save_conversation(
        &self,
        conversation_id: &str,
        messages: &[Message],
    ) -> VectorServiceResult<()>;
    async fn search_conversations(
        &self,
        query: &str,
        k: usize,
    ) -> VectorServiceResult<Vec<ConversationMatch>>;
    /// Generates a response grounded in retrieved knowledge and past
    /// conversations.
    async fn generate_response(
        &self,
        query: &str,
        conversation_history: &[Message],
    ) -> VectorServiceResult<RagResponse>;
}
