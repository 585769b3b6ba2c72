//! Convenience constructors for the wire types.

use crate::types::{
    HealthStatus, KnowledgeItem, KnowledgeMetadata, Message, MessageRole, MetadataValue,
    RetrievedContext,
};
use chrono::Utc;

impl Message {
    /// A user turn stamped with the current time.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            contexts: Vec::new(),
            is_error: None,
        }
    }

    /// An assistant turn stamped with the current time.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            contexts: Vec::new(),
            is_error: None,
        }
    }

    /// An assistant turn flagged as a synthesized failure notice.
    #[must_use]
    pub fn error_notice(content: impl Into<String>) -> Self {
        Self {
            is_error: Some(true),
            ..Self::assistant(content)
        }
    }

    /// Attaches the retrieved passages that grounded this turn.
    #[must_use]
    pub fn with_contexts(mut self, contexts: Vec<RetrievedContext>) -> Self {
        self.contexts = contexts;
        self
    }
}

impl KnowledgeMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl KnowledgeItem {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: KnowledgeMetadata::default(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: KnowledgeMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl HealthStatus {
    /// A report from a fully operational service.
    #[must_use]
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            vector_db_connected: true,
            model_loaded: Some(true),
            error: None,
        }
    }

    /// A report from a service that cannot reach its vector store.
    #[must_use]
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            vector_db_connected: false,
            model_loaded: None,
            error: Some(error.into()),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
