use futures::lock::Mutex;
use rag_client::{
    KnowledgeEntry, KnowledgeItem, KnowledgeMetadata, VectorService, VectorServiceResult,
};

/// Local read-mirror of the remote knowledge store.
///
/// The service stays authoritative: writes go through the gateway and a
/// refresh replaces the whole snapshot. A failed refresh keeps the previous
/// snapshot so a flaky service cannot blank the mirror.
#[derive(Default)]
pub struct KnowledgeCache {
    entries: Mutex<Vec<KnowledgeEntry>>,
}

impl KnowledgeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot with the service's current contents and return
    /// the new entry count.
    pub async fn refresh(&self, service: &dyn VectorService) -> VectorServiceResult<usize> {
        let entries = service.list_knowledge().await?;
        let count = entries.len();
        *self.entries.lock().await = entries;
        Ok(count)
    }

    /// Current snapshot, in backend order.
    pub async fn all(&self) -> Vec<KnowledgeEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

/// The fixed demonstration passages pushed into an empty knowledge store on
/// first initialization.
#[must_use]
pub fn sample_knowledge() -> Vec<KnowledgeItem> {
    vec![
        KnowledgeItem::new(
            "RAG (Retrieval-Augmented Generation) combines information retrieval with text \
             generation to produce more accurate and contextually relevant responses.",
        )
        .with_metadata(
            KnowledgeMetadata::new()
                .with_topic("AI")
                .with_category("definition")
                .with_confidence(0.95)
                .with_source("documentation"),
        ),
        KnowledgeItem::new(
            "Vector databases like ChromaDB store high-dimensional vectors (embeddings) that \
             represent semantic meaning of text, enabling efficient similarity search.",
        )
        .with_metadata(
            KnowledgeMetadata::new()
                .with_topic("Databases")
                .with_category("definition")
                .with_confidence(0.92)
                .with_source("technical_docs"),
        ),
        KnowledgeItem::new(
            "Machine learning embeddings convert text into numerical representations that \
             capture semantic relationships, allowing computers to understand meaning and \
             context.",
        )
        .with_metadata(
            KnowledgeMetadata::new()
                .with_topic("AI")
                .with_category("definition")
                .with_confidence(0.88)
                .with_source("research_paper"),
        ),
        KnowledgeItem::new(
            "Conversational AI systems can benefit from vector databases by storing and \
             retrieving relevant conversation history and knowledge to provide more contextual \
             responses.",
        )
        .with_metadata(
            KnowledgeMetadata::new()
                .with_topic("AI")
                .with_category("application")
                .with_confidence(0.85)
                .with_source("case_study"),
        ),
    ]
}
