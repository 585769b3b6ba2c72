use crate::{
    knowledge::{sample_knowledge, KnowledgeCache},
    opentelemetry::trace_dispatch,
    ChatError, ChatResult, ConnectivityState, Conversation, ConversationStore, DispatchMode,
    InitReport, MessageExchange,
};
use rag_client::{
    ConversationMatch, KnowledgeEntry, KnowledgeMatch, KnowledgeMetadata, Message, VectorService,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::watch;

/// Fixed assistant reply appended when the augmented path fails.
pub const GENERATION_APOLOGY: &str =
    "Sorry, I encountered an error while processing your message. Please try again.";

/// Prefix of the deterministic reply synthesized when retrieval is off.
pub const SIMPLE_MODE_PREFIX: &str = "I'm in simple mode. Here's my response: ";

/// Orchestrates conversations over the vector service: connectivity
/// lifecycle, knowledge mirroring and seeding, dispatch between
/// retrieval-augmented and plain responses, and auto-persistence.
pub struct ChatManager {
    service: Arc<dyn VectorService>,
    store: ConversationStore,
    cache: KnowledgeCache,
    connectivity: watch::Sender<ConnectivityState>,
    rag_mode: AtomicBool,
    auto_save: bool,
    search_k: usize,
}

impl ChatManager {
    #[must_use]
    pub fn new(params: ChatManagerParams) -> Self {
        let (connectivity, _) = watch::channel(ConnectivityState::Unknown);
        Self {
            service: params.service,
            store: ConversationStore::new(),
            cache: KnowledgeCache::new(),
            connectivity,
            rag_mode: AtomicBool::new(params.rag_mode),
            auto_save: params.auto_save,
            search_k: params.search_k,
        }
    }

    pub fn builder(service: Arc<dyn VectorService>) -> ChatManagerParams {
        ChatManagerParams::new(service)
    }

    /// Probe the service, mirror the knowledge store, seed it when a
    /// successful refresh finds it empty, and make sure a conversation is
    /// ready. Never fails: an unreachable service is reported as
    /// [`ConnectivityState::Disconnected`] and the manager keeps operating
    /// in plain mode.
    pub async fn initialize(&self) -> InitReport {
        let connectivity = match self.service.check_health().await {
            Ok(health) if health.vector_db_connected => ConnectivityState::Connected,
            Ok(health) => {
                tracing::warn!(status = %health.status, "Vector service reports itself unhealthy");
                ConnectivityState::Disconnected
            }
            Err(error) => {
                tracing::warn!(error = %error, "Vector service health check failed");
                ConnectivityState::Disconnected
            }
        };
        self.connectivity.send_replace(connectivity);

        let mut seeded = false;
        if connectivity.is_connected() {
            let refreshed = self.refresh_knowledge().await;
            if refreshed && self.cache.is_empty().await {
                seeded = self.seed_sample_knowledge().await;
            }
        }

        if self.store.current().await.is_none() {
            self.store.create().await;
        }

        let knowledge_entries = self.cache.len().await;
        tracing::info!(
            connectivity = connectivity.label(),
            knowledge_entries,
            seeded,
            "Chat manager initialized"
        );

        InitReport {
            connectivity,
            knowledge_entries,
            seeded,
        }
    }

    /// Append the user's message and produce the assistant's reply, through
    /// the vector service when retrieval is on and the service was last seen
    /// connected, locally otherwise. The active conversation always grows by
    /// exactly two messages.
    pub async fn send_message(&self, text: &str) -> ChatResult<MessageExchange> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let conversation = match self.store.current().await {
            Some(conversation) => conversation,
            None => self.store.create().await,
        };
        let mode = self.dispatch_mode();

        trace_dispatch(mode, &conversation.id, self.dispatch(text, mode)).await
    }

    /// Flip retrieval-augmented mode and return the new setting. Takes
    /// effect from the next dispatch.
    pub fn toggle_rag_mode(&self) -> bool {
        let enabled = !self.rag_mode.fetch_xor(true, Ordering::Relaxed);
        tracing::debug!(enabled, "RAG mode toggled");
        enabled
    }

    #[must_use]
    pub fn rag_mode(&self) -> bool {
        self.rag_mode.load(Ordering::Relaxed)
    }

    /// Start a fresh conversation and make it current.
    pub async fn start_new_conversation(&self) -> Conversation {
        self.store.create().await
    }

    /// Make an existing conversation current. An unknown id is an error and
    /// leaves the active conversation unchanged.
    pub async fn switch_conversation(&self, id: &str) -> ChatResult<Conversation> {
        self.store.switch_to(id).await
    }

    /// Drop every message of the active conversation, keeping its identity.
    pub async fn clear_current_conversation(&self) -> Option<Conversation> {
        self.store.clear_current().await
    }

    pub async fn current_conversation(&self) -> Option<Conversation> {
        self.store.current().await
    }

    /// Every conversation of the session, oldest first.
    pub async fn conversations(&self) -> Vec<Conversation> {
        self.store.conversations().await
    }

    /// Store a passage through the gateway, then refresh the local mirror
    /// (best effort).
    pub async fn add_knowledge(
        &self,
        text: &str,
        metadata: &KnowledgeMetadata,
    ) -> ChatResult<String> {
        let id = self.service.add_knowledge(text, metadata).await?;
        self.refresh_knowledge().await;
        Ok(id)
    }

    pub async fn update_knowledge(
        &self,
        id: &str,
        text: &str,
        metadata: &KnowledgeMetadata,
    ) -> ChatResult<()> {
        self.service.update_knowledge(id, text, metadata).await?;
        self.refresh_knowledge().await;
        Ok(())
    }

    pub async fn delete_knowledge(&self, id: &str) -> ChatResult<()> {
        self.service.delete_knowledge(id).await?;
        self.refresh_knowledge().await;
        Ok(())
    }

    /// Snapshot of the local knowledge mirror.
    pub async fn knowledge(&self) -> Vec<KnowledgeEntry> {
        self.cache.all().await
    }

    pub async fn search_knowledge(&self, query: &str, k: usize) -> ChatResult<Vec<KnowledgeMatch>> {
        Ok(self.service.search_knowledge(query, k).await?)
    }

    /// Search persisted conversations with the configured result count.
    pub async fn search_conversations(&self, query: &str) -> ChatResult<Vec<ConversationMatch>> {
        Ok(self
            .service
            .search_conversations(query, self.search_k)
            .await?)
    }

    /// The service's last observed reachability.
    #[must_use]
    pub fn connectivity(&self) -> ConnectivityState {
        *self.connectivity.borrow()
    }

    /// Watch connectivity transitions, e.g. to drive a status indicator.
    #[must_use]
    pub fn subscribe_connectivity(&self) -> watch::Receiver<ConnectivityState> {
        self.connectivity.subscribe()
    }

    fn dispatch_mode(&self) -> DispatchMode {
        if self.rag_mode.load(Ordering::Relaxed) && self.connectivity().is_connected() {
            DispatchMode::Augmented
        } else {
            DispatchMode::Plain
        }
    }

    async fn dispatch(&self, text: &str, mode: DispatchMode) -> ChatResult<MessageExchange> {
        let user = self.store.append(Message::user(text)).await;

        let (assistant, generation_error) = match mode {
            DispatchMode::Augmented => {
                let history = self
                    .store
                    .current()
                    .await
                    .map(|conversation| conversation.messages)
                    .unwrap_or_default();
                match self.service.generate_response(text, &history).await {
                    Ok(response) => (
                        Message::assistant(response.response).with_contexts(response.contexts),
                        None,
                    ),
                    Err(error) => {
                        tracing::warn!(error = %error, "Response generation failed; appending apology");
                        (Message::error_notice(GENERATION_APOLOGY), Some(error))
                    }
                }
            }
            DispatchMode::Plain => (
                Message::assistant(format!("{SIMPLE_MODE_PREFIX}{text}")),
                None,
            ),
        };

        let assistant = self.store.append(assistant).await;

        if self.auto_save {
            self.auto_save_current().await;
        }

        Ok(MessageExchange {
            user,
            assistant,
            generation_error,
        })
    }

    async fn auto_save_current(&self) {
        let conversation = match self.store.current().await {
            Some(conversation) if !conversation.messages.is_empty() => conversation,
            _ => return,
        };
        if let Err(error) = self
            .service
            .save_conversation(&conversation.id, &conversation.messages)
            .await
        {
            tracing::warn!(error = %error, "Auto-save failed");
        }
    }

    /// Mirror the remote store into the local cache, reporting whether the
    /// listing succeeded. A failure keeps the previous snapshot.
    async fn refresh_knowledge(&self) -> bool {
        match self.cache.refresh(self.service.as_ref()).await {
            Ok(entries) => {
                tracing::info!(entries, "Knowledge cache refreshed");
                true
            }
            Err(error) => {
                tracing::warn!(error = %error, "Knowledge refresh failed; keeping previous snapshot");
                false
            }
        }
    }

    async fn seed_sample_knowledge(&self) -> bool {
        match self.service.batch_add_knowledge(&sample_knowledge()).await {
            Ok(added) => {
                tracing::info!(added, "Seeded sample knowledge into the empty store");
                self.refresh_knowledge().await;
                true
            }
            Err(error) => {
                tracing::warn!(error = %error, "Failed to seed sample knowledge");
                false
            }
        }
    }
}

/// Parameters required to create a new chat manager.
/// # Default Values
/// - `rag_mode`: `true`
/// - `auto_save`: `true`
/// - `search_k`: 2
pub struct ChatManagerParams {
    /// The gateway to the vector service.
    pub service: Arc<dyn VectorService>,
    /// Whether dispatches ask the service for retrieval-augmented responses.
    pub rag_mode: bool,
    /// Whether each exchange persists the conversation afterwards.
    pub auto_save: bool,
    /// Result count for conversation-similarity searches.
    pub search_k: usize,
}

impl ChatManagerParams {
    pub fn new(service: Arc<dyn VectorService>) -> Self {
        Self {
            service,
            rag_mode: true,
            auto_save: true,
            search_k: 2,
        }
    }

    /// Set whether dispatches start in retrieval-augmented mode.
    #[must_use]
    pub fn rag_mode(mut self, rag_mode: bool) -> Self {
        self.rag_mode = rag_mode;
        self
    }

    /// Set whether each exchange persists the conversation.
    #[must_use]
    pub fn auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }

    /// Set the result count for conversation-similarity searches.
    #[must_use]
    pub fn search_k(mut self, search_k: usize) -> Self {
        self.search_k = search_k;
        self
    }

    #[must_use]
    pub fn build(self) -> ChatManager {
        ChatManager::new(self)
    }
}
