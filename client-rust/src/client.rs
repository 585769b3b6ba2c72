use crate::{
    api,
    client_utils::{delete_json, get_json, get_json_any_status, post_json, put_json},
    opentelemetry::{trace_request, RequestSpan},
    ConversationMatch, HealthStatus, KnowledgeEntry, KnowledgeItem, KnowledgeMatch,
    KnowledgeMetadata, Message, RagResponse, VectorService, VectorServiceError,
    VectorServiceResult,
};
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// HTTP client for the RAG vector service.
pub struct RagVectorClient {
    base_url: String,
    client: Client,
}

impl RagVectorClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Point the client at another service instance. A trailing slash is
    /// stripped so route paths can be joined uniformly.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

impl Default for RagVectorClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VectorService for RagVectorClient {
    fn provider(&self) -> &'static str {
        "rag-vector-api"
    }

    async fn check_health(&self) -> VectorServiceResult<HealthStatus> {
        let url = self.endpoint("api/health");
        let span = RequestSpan::new(self.provider(), "check_health", "GET", &url);

        trace_request(&span, get_json_any_status(&self.client, &url, &span)).await
    }

    async fn add_knowledge(
        &self,
        text: &str,
        metadata: &KnowledgeMetadata,
    ) -> VectorServiceResult<String> {
        require_text(text, "text")?;

        let url = self.endpoint("api/add-knowledge");
        let span = RequestSpan::new(self.provider(), "add_knowledge", "POST", &url);
        let body = api::KnowledgePayload { text, metadata };

        trace_request(&span, async {
            let response: api::AddKnowledgeResponse =
                post_json(&self.client, &url, &body, &span).await?;
            acknowledged(response.success)?;
            response.id.ok_or_else(|| {
                VectorServiceError::Invariant("add-knowledge response missing id".to_string())
            })
        })
        .await
    }

    async fn batch_add_knowledge(&self, items: &[KnowledgeItem]) -> VectorServiceResult<usize> {
        if items.is_empty() {
            return Err(VectorServiceError::InvalidInput(
                "items must not be empty".to_string(),
            ));
        }

        let url = self.endpoint("api/batch-add-knowledge");
        let span = RequestSpan::new(self.provider(), "batch_add_knowledge", "POST", &url);
        let body = api::BatchAddRequest { items };

        trace_request(&span, async {
            let response: api::BatchAddResponse =
                post_json(&self.client, &url, &body, &span).await?;
            acknowledged(response.success)?;
            Ok(response.added_count)
        })
        .await
    }

    async fn list_knowledge(&self) -> VectorServiceResult<Vec<KnowledgeEntry>> {
        let url = self.endpoint("api/get-all-knowledge");
        let span = RequestSpan::new(self.provider(), "list_knowledge", "GET", &url);

        trace_request(&span, async {
            let response: api::KnowledgeVectorsResponse =
                get_json(&self.client, &url, &span).await?;
            Ok(response.vectors)
        })
        .await
    }

    async fn search_knowledge(
        &self,
        query: &str,
        k: usize,
    ) -> VectorServiceResult<Vec<KnowledgeMatch>> {
        require_text(query, "query")?;

        let url = self.endpoint("api/search-knowledge");
        let span = RequestSpan::new(self.provider(), "search_knowledge", "POST", &url);
        let body = api::SearchRequest { query, k };

        trace_request(&span, async {
            let response: api::KnowledgeSearchResponse =
                post_json(&self.client, &url, &body, &span).await?;
            Ok(response.results)
        })
        .await
    }

    async fn update_knowledge(
        &self,
        id: &str,
        text: &str,
        metadata: &KnowledgeMetadata,
    ) -> VectorServiceResult<()> {
        require_text(id, "id")?;
        require_text(text, "text")?;

        let url = self.endpoint(&format!("api/update-knowledge/{id}"));
        let span = RequestSpan::new(self.provider(), "update_knowledge", "PUT", &url);
        let body = api::KnowledgePayload { text, metadata };

        trace_request(&span, async {
            let response: api::Ack = put_json(&self.client, &url, &body, &span).await?;
            acknowledged(response.success)
        })
        .await
    }

    async fn delete_knowledge(&self, id: &str) -> VectorServiceResult<()> {
        require_text(id, "id")?;

        let url = self.endpoint(&format!("api/delete-knowledge/{id}"));
        let span = RequestSpan::new(self.provider(), "delete_knowledge", "DELETE", &url);

        trace_request(&span, async {
            let response: api::Ack = delete_json(&self.client, &url, &span).await?;
            acknowledged(response.success)
        })
        .await
    }

    async fn save_conversation(
        &self,
        conversation_id: &str,
        messages: &[Message],
    ) -> VectorServiceResult<()> {
        require_text(conversation_id, "conversation_id")?;
        if messages.is_empty() {
            return Err(VectorServiceError::InvalidInput(
                "messages must not be empty".to_string(),
            ));
        }

        let url = self.endpoint("api/save-conversation");
        let span = RequestSpan::new(self.provider(), "save_conversation", "POST", &url);
        let body = api::SaveConversationRequest {
            conversation_id,
            messages,
        };

        trace_request(&span, async {
            let response: api::Ack = post_json(&self.client, &url, &body, &span).await?;
            acknowledged(response.success)
        })
        .await
    }

    async fn search_conversations(
        &self,
        query: &str,
        k: usize,
    ) -> VectorServiceResult<Vec<ConversationMatch>> {
        require_text(query, "query")?;

        let url = self.endpoint("api/search-conversations");
        let span = RequestSpan::new(self.provider(), "search_conversations", "POST", &url);
        let body = api::SearchRequest { query, k };

        trace_request(&span, async {
            let response: api::ConversationSearchResponse =
                post_json(&self.client, &url, &body, &span).await?;
            Ok(response.results)
        })
        .await
    }

    async fn generate_response(
        &self,
        query: &str,
        conversation_history: &[Message],
    ) -> VectorServiceResult<RagResponse> {
        require_text(query, "query")?;

        let url = self.endpoint("api/generate-rag-response");
        let span = RequestSpan::new(self.provider(), "generate_response", "POST", &url);
        let body = api::GenerateRagRequest {
            query,
            conversation_history,
        };

        trace_request(&span, post_json(&self.client, &url, &body, &span)).await
    }
}

fn require_text(value: &str, what: &str) -> VectorServiceResult<()> {
    if value.trim().is_empty() {
        return Err(VectorServiceError::InvalidInput(format!(
            "{what} must not be empty"
        )));
    }
    Ok(())
}

fn acknowledged(success: bool) -> VectorServiceResult<()> {
    if success {
        Ok(())
    } else {
        Err(VectorServiceError::Invariant(
            "service reported failure alongside a success status".to_string(),
        ))
    }
}
