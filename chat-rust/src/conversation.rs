use crate::{ChatError, ChatResult};
use chrono::{DateTime, Utc};
use futures::lock::Mutex;
use rag_client::Message;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One chat thread: an append-only message sequence with a stable identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    fn new(ordinal: usize) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: format!("Conversation {ordinal}"),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Owns every conversation of the session and tracks the active one.
///
/// Conversations are never deleted, only superseded as current, so positions
/// in the list are stable. Message timestamps are clamped on append to keep
/// each transcript non-decreasing even when the wall clock steps backwards.
#[derive(Default)]
pub struct ConversationStore {
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    conversations: Vec<Conversation>,
    current: Option<usize>,
}

impl StoreState {
    fn create(&mut self) -> Conversation {
        let conversation = Conversation::new(self.conversations.len() + 1);
        self.conversations.push(conversation.clone());
        self.current = Some(self.conversations.len() - 1);
        conversation
    }
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation, make it current, and return a copy.
    pub async fn create(&self) -> Conversation {
        self.state.lock().await.create()
    }

    /// A copy of the active conversation, if one exists.
    pub async fn current(&self) -> Option<Conversation> {
        let state = self.state.lock().await;
        state
            .current
            .map(|index| state.conversations[index].clone())
    }

    /// The id of the active conversation, if one exists.
    pub async fn current_id(&self) -> Option<String> {
        let state = self.state.lock().await;
        state
            .current
            .map(|index| state.conversations[index].id.clone())
    }

    /// Make the conversation with `id` current. An unknown id leaves the
    /// active conversation unchanged.
    pub async fn switch_to(&self, id: &str) -> ChatResult<Conversation> {
        let mut state = self.state.lock().await;
        match state.conversations.iter().position(|c| c.id == id) {
            Some(index) => {
                state.current = Some(index);
                Ok(state.conversations[index].clone())
            }
            None => Err(ChatError::ConversationNotFound(id.to_string())),
        }
    }

    /// Append a message to the active conversation, creating one first when
    /// none is active. Returns the message as stored, with its timestamp
    /// clamped against the previous one.
    pub async fn append(&self, mut message: Message) -> Message {
        let mut state = self.state.lock().await;
        let index = match state.current {
            Some(index) => index,
            None => {
                state.create();
                state.conversations.len() - 1
            }
        };

        let conversation = &mut state.conversations[index];
        if let Some(last) = conversation.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        }
        conversation.updated_at = Utc::now();
        conversation.messages.push(message.clone());
        message
    }

    /// Empty the active conversation's messages, keeping its identity and
    /// title. Returns the cleared conversation.
    pub async fn clear_current(&self) -> Option<Conversation> {
        let mut state = self.state.lock().await;
        let index = state.current?;
        let conversation = &mut state.conversations[index];
        conversation.messages.clear();
        conversation.updated_at = Utc::now();
        Some(conversation.clone())
    }

    /// Ordered snapshot of every conversation, oldest first.
    pub async fn conversations(&self) -> Vec<Conversation> {
        self.state.lock().await.conversations.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.conversations.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.conversations.is_empty()
    }
}
