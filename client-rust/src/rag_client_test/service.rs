use std::{collections::VecDeque, sync::Mutex};

use crate::{
    errors::{VectorServiceError, VectorServiceResult},
    vector_service::VectorService,
    ConversationMatch, HealthStatus, KnowledgeEntry, KnowledgeItem, KnowledgeMatch,
    KnowledgeMetadata, Message, RagResponse,
};

/// Arguments of a tracked `add_knowledge` call.
#[derive(Debug, Clone, PartialEq)]
pub struct AddKnowledgeCall {
    pub text: String,
    pub metadata: KnowledgeMetadata,
}

/// Arguments of a tracked `update_knowledge` call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateKnowledgeCall {
    pub id: String,
    pub text: String,
    pub metadata: KnowledgeMetadata,
}

/// Arguments of a tracked `search_knowledge` or `search_conversations` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub query: String,
    pub k: usize,
}

/// Arguments of a tracked `save_conversation` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveConversationCall {
    pub conversation_id: String,
    pub messages: Vec<Message>,
}

/// Arguments of a tracked `generate_response` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateCall {
    pub query: String,
    pub conversation_history: Vec<Message>,
}

#[derive(Default)]
struct MockVectorServiceState {
    mocked_health_results: VecDeque<VectorServiceResult<HealthStatus>>,
    mocked_add_results: VecDeque<VectorServiceResult<String>>,
    mocked_batch_add_results: VecDeque<VectorServiceResult<usize>>,
    mocked_list_results: VecDeque<VectorServiceResult<Vec<KnowledgeEntry>>>,
    mocked_knowledge_search_results: VecDeque<VectorServiceResult<Vec<KnowledgeMatch>>>,
    mocked_update_results: VecDeque<VectorServiceResult<()>>,
    mocked_delete_results: VecDeque<VectorServiceResult<()>>,
    mocked_save_results: VecDeque<VectorServiceResult<()>>,
    mocked_conversation_search_results: VecDeque<VectorServiceResult<Vec<ConversationMatch>>>,
    mocked_generate_results: VecDeque<VectorServiceResult<RagResponse>>,
    tracked_health_checks: usize,
    tracked_adds: Vec<AddKnowledgeCall>,
    tracked_batch_adds: Vec<Vec<KnowledgeItem>>,
    tracked_list_calls: usize,
    tracked_knowledge_searches: Vec<SearchCall>,
    tracked_updates: Vec<UpdateKnowledgeCall>,
    tracked_deletes: Vec<String>,
    tracked_saves: Vec<SaveConversationCall>,
    tracked_conversation_searches: Vec<SearchCall>,
    tracked_generates: Vec<GenerateCall>,
}

impl MockVectorServiceState {
    fn reset(&mut self) {
        self.tracked_health_checks = 0;
        self.tracked_adds.clear();
        self.tracked_batch_adds.clear();
        self.tracked_list_calls = 0;
        self.tracked_knowledge_searches.clear();
        self.tracked_updates.clear();
        self.tracked_deletes.clear();
        self.tracked_saves.clear();
        self.tracked_conversation_searches.clear();
        self.tracked_generates.clear();
    }

    fn restore(&mut self) {
        self.mocked_health_results.clear();
        self.mocked_add_results.clear();
        self.mocked_batch_add_results.clear();
        self.mocked_list_results.clear();
        self.mocked_knowledge_search_results.clear();
        self.mocked_update_results.clear();
        self.mocked_delete_results.clear();
        self.mocked_save_results.clear();
        self.mocked_conversation_search_results.clear();
        self.mocked_generate_results.clear();
        self.reset();
    }
}

/// A mock vector service for testing that tracks call arguments and yields
/// predefined results.
///
/// Every operation pops its next result from a per-operation queue and fails
/// with [`VectorServiceError::Invariant`] when the queue is empty, so a test
/// that forgets to enqueue a result fails loudly instead of silently
/// succeeding.
pub struct MockVectorService {
    provider: &'static str,
    state: Mutex<MockVectorServiceState>,
}

impl Default for MockVectorService {
    fn default() -> Self {
        Self {
            provider: "mock",
            state: Mutex::new(MockVectorServiceState::default()),
        }
    }
}

impl MockVectorService {
    /// Construct a new mock vector service instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the provider identifier returned by the mock.
    pub fn set_provider(&mut self, provider: &'static str) {
        self.provider = provider;
    }

    /// Enqueue a mocked `check_health` result.
    pub fn enqueue_health(&self, result: VectorServiceResult<HealthStatus>) -> &Self {
        self.lock_state().mocked_health_results.push_back(result);
        self
    }

    /// Enqueue a mocked `add_knowledge` result.
    pub fn enqueue_add(&self, result: VectorServiceResult<String>) -> &Self {
        self.lock_state().mocked_add_results.push_back(result);
        self
    }

    /// Enqueue a mocked `batch_add_knowledge` result.
    pub fn enqueue_batch_add(&self, result: VectorServiceResult<usize>) -> &Self {
        self.lock_state().mocked_batch_add_results.push_back(result);
        self
    }

    /// Enqueue a mocked `list_knowledge` result.
    pub fn enqueue_list(&self, result: VectorServiceResult<Vec<KnowledgeEntry>>) -> &Self {
        self.lock_state().mocked_list_results.push_back(result);
        self
    }

    /// Enqueue a mocked `search_knowledge` result.
    pub fn enqueue_knowledge_search(
        &self,
        result: VectorServiceResult<Vec<KnowledgeMatch>>,
    ) -> &Self {
        self.lock_state()
            .mocked_knowledge_search_results
            .push_back(result);
        self
    }

    /// Enqueue a mocked `update_knowledge` result.
    pub fn enqueue_update(&self, result: VectorServiceResult<()>) -> &Self {
        self.lock_state().mocked_update_results.push_back(result);
        self
    }

    /// Enqueue a mocked `delete_knowledge` result.
    pub fn enqueue_delete(&self, result: VectorServiceResult<()>) -> &Self {
        self.lock_state().mocked_delete_results.push_back(result);
        self
    }

    /// Enqueue a mocked `save_conversation` result.
    pub fn enqueue_save(&self, result: VectorServiceResult<()>) -> &Self {
        self.lock_state().mocked_save_results.push_back(result);
        self
    }

    /// Enqueue a mocked `search_conversations` result.
    pub fn enqueue_conversation_search(
        &self,
        result: VectorServiceResult<Vec<ConversationMatch>>,
    ) -> &Self {
        self.lock_state()
            .mocked_conversation_search_results
            .push_back(result);
        self
    }

    /// Enqueue a mocked `generate_response` result.
    pub fn enqueue_generate(&self, result: VectorServiceResult<RagResponse>) -> &Self {
        self.lock_state().mocked_generate_results.push_back(result);
        self
    }

    /// How many `check_health` calls the mock has served.
    pub fn tracked_health_checks(&self) -> usize {
        self.lock_state().tracked_health_checks
    }

    /// Retrieve the tracked `add_knowledge` calls accumulated so far.
    pub fn tracked_adds(&self) -> Vec<AddKnowledgeCall> {
        self.lock_state().tracked_adds.clone()
    }

    /// Retrieve the tracked `batch_add_knowledge` calls accumulated so far.
    pub fn tracked_batch_adds(&self) -> Vec<Vec<KnowledgeItem>> {
        self.lock_state().tracked_batch_adds.clone()
    }

    /// How many `list_knowledge` calls the mock has served.
    pub fn tracked_list_calls(&self) -> usize {
        self.lock_state().tracked_list_calls
    }

    /// Retrieve the tracked `search_knowledge` calls accumulated so far.
    pub fn tracked_knowledge_searches(&self) -> Vec<SearchCall> {
        self.lock_state().tracked_knowledge_searches.clone()
    }

    /// Retrieve the tracked `update_knowledge` calls accumulated so far.
    pub fn tracked_updates(&self) -> Vec<UpdateKnowledgeCall> {
        self.lock_state().tracked_updates.clone()
    }

    /// Retrieve the ids of the tracked `delete_knowledge` calls.
    pub fn tracked_deletes(&self) -> Vec<String> {
        self.lock_state().tracked_deletes.clone()
    }

    /// Retrieve the tracked `save_conversation` calls accumulated so far.
    pub fn tracked_saves(&self) -> Vec<SaveConversationCall> {
        self.lock_state().tracked_saves.clone()
    }

    /// Retrieve the tracked `search_conversations` calls accumulated so far.
    pub fn tracked_conversation_searches(&self) -> Vec<SearchCall> {
        self.lock_state().tracked_conversation_searches.clone()
    }

    /// Retrieve the tracked `generate_response` calls accumulated so far.
    pub fn tracked_generates(&self) -> Vec<GenerateCall> {
        self.lock_state().tracked_generates.clone()
    }

    /// Reset tracked calls without touching enqueued results.
    pub fn reset(&self) {
        self.lock_state().reset();
    }

    /// Clear both tracked calls and enqueued results.
    pub fn restore(&self) {
        self.lock_state().restore();
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, MockVectorServiceState> {
        self.state.lock().expect("mock state poisoned")
    }

    fn pop<T>(
        queue: &mut VecDeque<VectorServiceResult<T>>,
        operation: &str,
    ) -> VectorServiceResult<T> {
        queue.pop_front().ok_or_else(|| {
            VectorServiceError::Invariant(format!("no mocked {operation} results available"))
        })?
    }
}

#[async_trait::async_trait]
impl VectorService for MockVectorService {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn check_health(&self) -> VectorServiceResult<HealthStatus> {
        let mut state = self.lock_state();
        state.tracked_health_checks += 1;
        Self::pop(&mut state.mocked_health_results, "check_health")
    }

    async fn add_knowledge(
        &self,
        text: &str,
        metadata: &KnowledgeMetadata,
    ) -> VectorServiceResult<String> {
        let mut state = self.lock_state();
        state.tracked_adds.push(AddKnowledgeCall {
            text: text.to_string(),
            metadata: metadata.clone(),
        });
        Self::pop(&mut state.mocked_add_results, "add_knowledge")
    }

    async fn batch_add_knowledge(&self, items: &[KnowledgeItem]) -> VectorServiceResult<usize> {
        let mut state = self.lock_state();
        state.tracked_batch_adds.push(items.to_vec());
        Self::pop(&mut state.mocked_batch_add_results, "batch_add_knowledge")
    }

    async fn list_knowledge(&self) -> VectorServiceResult<Vec<KnowledgeEntry>> {
        let mut state = self.lock_state();
        state.tracked_list_calls += 1;
        Self::pop(&mut state.mocked_list_results, "list_knowledge")
    }

    async fn search_knowledge(
        &self,
        query: &str,
        k: usize,
    ) -> VectorServiceResult<Vec<KnowledgeMatch>> {
        let mut state = self.lock_state();
        state.tracked_knowledge_searches.push(SearchCall {
            query: query.to_string(),
            k,
        });
        Self::pop(&mut state.mocked_knowledge_search_results, "search_knowledge")
    }

    async fn update_knowledge(
        &self,
        id: &str,
        text: &str,
        metadata: &KnowledgeMetadata,
    ) -> VectorServiceResult<()> {
        let mut state = self.lock_state();
        state.tracked_updates.push(UpdateKnowledgeCall {
            id: id.to_string(),
            text: text.to_string(),
            metadata: metadata.clone(),
        });
        Self::pop(&mut state.mocked_update_results, "update_knowledge")
    }

    async fn delete_knowledge(&self, id: &str) -> VectorServiceResult<()> {
        let mut state = self.lock_state();
        state.tracked_deletes.push(id.to_string());
        Self::pop(&mut state.mocked_delete_results, "delete_knowledge")
    }

    async fn save_conversation(
        &self,
        conversation_id: &str,
        messages: &[Message],
    ) -> VectorServiceResult<()> {
        let mut state = self.lock_state();
        state.tracked_saves.push(SaveConversationCall {
            conversation_id: conversation_id.to_string(),
            messages: messages.to_vec(),
        });
        Self::pop(&mut state.mocked_save_results, "save_conversation")
    }

    async fn search_conversations(
        &self,
        query: &str,
        k: usize,
    ) -> VectorServiceResult<Vec<ConversationMatch>> {
        let mut state = self.lock_state();
        state.tracked_conversation_searches.push(SearchCall {
            query: query.to_string(),
            k,
        });
        Self::pop(
            &mut state.mocked_conversation_search_results,
            "search_conversations",
        )
    }

    async fn generate_response(
        &self,
        query: &str,
        conversation_history: &[Message],
    ) -> VectorServiceResult<RagResponse> {
        let mut state = self.lock_state();
        state.tracked_generates.push(GenerateCall {
            query: query.to_string(),
            conversation_history: conversation_history.to_vec(),
        });
        Self::pop(&mut state.mocked_generate_results, "generate_response")
    }
}
