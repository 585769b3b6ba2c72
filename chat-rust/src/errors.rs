use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Vector service error: {0}")]
    Service(#[from] rag_client::VectorServiceError),
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),
    #[error("Message text must not be empty")]
    EmptyMessage,
}

pub type ChatResult<T> = Result<T, ChatError>;
