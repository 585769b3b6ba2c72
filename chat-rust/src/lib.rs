mod conversation;
mod errors;
mod knowledge;
mod manager;
mod opentelemetry;
mod types;

pub use conversation::{Conversation, ConversationStore};
pub use errors::{ChatError, ChatResult};
pub use knowledge::{sample_knowledge, KnowledgeCache};
pub use manager::{ChatManager, ChatManagerParams, GENERATION_APOLOGY, SIMPLE_MODE_PREFIX};
pub use types::*;
