use std::{collections::HashMap, sync::Arc};

use rag_chat::{
    sample_knowledge, ChatError, ChatManager, ChatManagerParams, ConnectivityState,
    GENERATION_APOLOGY, SIMPLE_MODE_PREFIX,
};
use rag_client::{
    rag_client_test::MockVectorService, ContextKind, HealthStatus, KnowledgeEntry,
    KnowledgeMetadata, MessageRole, RagResponse, RetrievedContext, VectorServiceError,
};

fn entry(id: &str, text: &str) -> KnowledgeEntry {
    KnowledgeEntry {
        id: id.to_string(),
        text: text.to_string(),
        metadata: KnowledgeMetadata::new(),
    }
}

fn knowledge_context(content: &str) -> RetrievedContext {
    RetrievedContext {
        kind: ContextKind::Knowledge,
        content: content.to_string(),
        metadata: HashMap::new(),
        similarity: 0.9,
    }
}

fn rag_response(text: &str, contexts: Vec<RetrievedContext>) -> RagResponse {
    RagResponse {
        response: text.to_string(),
        contexts,
    }
}

/// Build and initialize a manager against a healthy service whose store
/// already holds one entry, then clear the tracked calls so each test only
/// sees its own traffic.
async fn connected_manager_with(
    service: &Arc<MockVectorService>,
    params: ChatManagerParams,
) -> ChatManager {
    service
        .enqueue_health(Ok(HealthStatus::healthy()))
        .enqueue_list(Ok(vec![entry("k1", "existing entry")]));

    let manager = ChatManager::new(params);
    let report = manager.initialize().await;
    assert_eq!(report.connectivity, ConnectivityState::Connected);
    service.reset();
    manager
}

async fn connected_manager(service: &Arc<MockVectorService>) -> ChatManager {
    connected_manager_with(
        service,
        ChatManagerParams::new(service.clone()).auto_save(false),
    )
    .await
}

#[tokio::test]
async fn initialize_reports_connected_and_mirrors_knowledge() {
    let service = Arc::new(MockVectorService::new());
    service
        .enqueue_health(Ok(HealthStatus::healthy()))
        .enqueue_list(Ok(vec![entry("k1", "first"), entry("k2", "second")]));

    let manager = ChatManager::new(ChatManagerParams::new(service.clone()));
    let report = manager.initialize().await;

    assert_eq!(report.connectivity, ConnectivityState::Connected);
    assert_eq!(report.knowledge_entries, 2);
    assert!(!report.seeded);
    assert_eq!(manager.connectivity(), ConnectivityState::Connected);
    assert_eq!(service.tracked_health_checks(), 1);
    assert_eq!(service.tracked_list_calls(), 1);
    assert!(service.tracked_batch_adds().is_empty());

    let knowledge = manager.knowledge().await;
    assert_eq!(knowledge.len(), 2);
    assert_eq!(knowledge[0].id, "k1");
    assert!(manager.current_conversation().await.is_some());
}

#[tokio::test]
async fn initialize_seeds_the_sample_set_into_an_empty_store() {
    let service = Arc::new(MockVectorService::new());
    let seeded_entries: Vec<KnowledgeEntry> = sample_knowledge()
        .iter()
        .enumerate()
        .map(|(index, item)| KnowledgeEntry {
            id: format!("seed-{index}"),
            text: item.text.clone(),
            metadata: item.metadata.clone(),
        })
        .collect();
    service
        .enqueue_health(Ok(HealthStatus::healthy()))
        .enqueue_list(Ok(Vec::new()))
        .enqueue_batch_add(Ok(4))
        .enqueue_list(Ok(seeded_entries));

    let manager = ChatManager::new(ChatManagerParams::new(service.clone()));
    let report = manager.initialize().await;

    assert_eq!(report.connectivity, ConnectivityState::Connected);
    assert!(report.seeded);
    assert_eq!(report.knowledge_entries, 4);

    let batches = service.tracked_batch_adds();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0], sample_knowledge());
    assert_eq!(batches[0][0].metadata.topic.as_deref(), Some("AI"));
}

#[tokio::test]
async fn initialize_skips_seeding_when_the_knowledge_refresh_fails() {
    let service = Arc::new(MockVectorService::new());
    service
        .enqueue_health(Ok(HealthStatus::healthy()))
        .enqueue_list(Err(VectorServiceError::Invariant(
            "listing offline".to_string(),
        )));

    let manager = ChatManager::new(ChatManagerParams::new(service.clone()).auto_save(false));
    let report = manager.initialize().await;

    // The backend may still hold entries the failed listing could not see.
    assert_eq!(report.connectivity, ConnectivityState::Connected);
    assert!(!report.seeded);
    assert_eq!(report.knowledge_entries, 0);
    assert_eq!(service.tracked_list_calls(), 1);
    assert!(service.tracked_batch_adds().is_empty());
}

#[tokio::test]
async fn initialize_degrades_to_disconnected_when_the_health_probe_fails() {
    let service = Arc::new(MockVectorService::new());
    service.enqueue_health(Err(VectorServiceError::Invariant(
        "connection refused".to_string(),
    )));

    let manager = ChatManager::new(ChatManagerParams::new(service.clone()).auto_save(false));
    let report = manager.initialize().await;

    assert_eq!(report.connectivity, ConnectivityState::Disconnected);
    assert_eq!(report.knowledge_entries, 0);
    assert!(!report.seeded);
    assert_eq!(service.tracked_list_calls(), 0);
    assert!(service.tracked_batch_adds().is_empty());
    assert!(manager.current_conversation().await.is_some());

    let exchange = manager
        .send_message("hello there")
        .await
        .expect("a disconnected manager should still answer");
    assert_eq!(
        exchange.assistant.content,
        format!("{SIMPLE_MODE_PREFIX}hello there")
    );
    assert!(service.tracked_generates().is_empty());
}

#[tokio::test]
async fn initialize_treats_an_unhealthy_report_as_disconnected() {
    let service = Arc::new(MockVectorService::new());
    service.enqueue_health(Ok(HealthStatus::unhealthy("vector db unavailable")));

    let manager = ChatManager::new(ChatManagerParams::new(service.clone()).auto_save(false));
    let report = manager.initialize().await;

    assert_eq!(report.connectivity, ConnectivityState::Disconnected);
    assert_eq!(service.tracked_list_calls(), 0);
}

#[tokio::test]
async fn send_message_routes_through_the_service_and_carries_contexts() {
    let service = Arc::new(MockVectorService::new());
    let manager = connected_manager(&service).await;
    service.enqueue_generate(Ok(rag_response(
        "RAG blends retrieval with generation.",
        vec![knowledge_context("RAG combines retrieval and generation.")],
    )));

    let exchange = manager
        .send_message("  What is RAG?  ")
        .await
        .expect("augmented dispatch should succeed");

    assert_eq!(exchange.user.role, MessageRole::User);
    assert_eq!(exchange.user.content, "What is RAG?");
    assert_eq!(
        exchange.assistant.content,
        "RAG blends retrieval with generation."
    );
    assert_eq!(exchange.assistant.contexts.len(), 1);
    assert_eq!(exchange.assistant.contexts[0].kind, ContextKind::Knowledge);
    assert!(exchange.generation_error.is_none());

    let generates = service.tracked_generates();
    assert_eq!(generates.len(), 1);
    assert_eq!(generates[0].query, "What is RAG?");
    assert_eq!(generates[0].conversation_history.len(), 1);
    assert_eq!(generates[0].conversation_history[0].content, "What is RAG?");

    let conversation = manager
        .current_conversation()
        .await
        .expect("a conversation should be active");
    assert_eq!(conversation.messages.len(), 2);
}

#[tokio::test]
async fn send_message_appends_an_apology_when_generation_fails() {
    let service = Arc::new(MockVectorService::new());
    let manager = connected_manager(&service).await;
    service.enqueue_generate(Err(VectorServiceError::Invariant(
        "generation backend offline".to_string(),
    )));

    let exchange = manager
        .send_message("explain embeddings")
        .await
        .expect("a failed generation still yields an exchange");

    assert_eq!(exchange.assistant.content, GENERATION_APOLOGY);
    assert_eq!(exchange.assistant.is_error, Some(true));
    assert!(exchange.assistant.contexts.is_empty());
    match exchange.generation_error {
        Some(VectorServiceError::Invariant(message)) => {
            assert_eq!(message, "generation backend offline");
        }
        other => panic!("unexpected generation error: {other:?}"),
    }

    let conversation = manager
        .current_conversation()
        .await
        .expect("a conversation should be active");
    assert_eq!(conversation.messages.len(), 2);
    assert_eq!(conversation.messages[1].is_error, Some(true));
}

#[tokio::test]
async fn toggle_rag_mode_switches_between_augmented_and_plain() {
    let service = Arc::new(MockVectorService::new());
    let manager = connected_manager(&service).await;

    assert!(manager.rag_mode());
    assert!(!manager.toggle_rag_mode());

    let exchange = manager
        .send_message("hello")
        .await
        .expect("plain dispatch should succeed");
    assert_eq!(
        exchange.assistant.content,
        format!("{SIMPLE_MODE_PREFIX}hello")
    );
    assert!(exchange.assistant.contexts.is_empty());
    assert!(service.tracked_generates().is_empty());

    assert!(manager.toggle_rag_mode());
    service.enqueue_generate(Ok(rag_response("augmented again", Vec::new())));
    let exchange = manager
        .send_message("hello again")
        .await
        .expect("augmented dispatch should succeed after toggling back");
    assert_eq!(exchange.assistant.content, "augmented again");
    assert_eq!(service.tracked_generates().len(), 1);
}

#[tokio::test]
async fn send_message_rejects_blank_text() {
    let service = Arc::new(MockVectorService::new());
    let manager = connected_manager(&service).await;

    let err = manager
        .send_message("   ")
        .await
        .expect_err("blank input should be rejected");
    match err {
        ChatError::EmptyMessage => {}
        other => panic!("unexpected error variant: {other:?}"),
    }

    let conversation = manager
        .current_conversation()
        .await
        .expect("a conversation should be active");
    assert!(conversation.messages.is_empty());
}

#[tokio::test]
async fn every_exchange_grows_the_conversation_by_exactly_two() {
    let service = Arc::new(MockVectorService::new());
    let manager = connected_manager(&service).await;

    service.enqueue_generate(Ok(rag_response("one", Vec::new())));
    manager
        .send_message("first")
        .await
        .expect("first exchange should succeed");

    service.enqueue_generate(Err(VectorServiceError::Invariant("down".to_string())));
    manager
        .send_message("second")
        .await
        .expect("a degraded exchange still completes");

    manager.toggle_rag_mode();
    manager
        .send_message("third")
        .await
        .expect("plain exchange should succeed");

    let conversation = manager
        .current_conversation()
        .await
        .expect("a conversation should be active");
    assert_eq!(conversation.messages.len(), 6);
    let roles: Vec<MessageRole> = conversation
        .messages
        .iter()
        .map(|message| message.role)
        .collect();
    assert_eq!(
        roles,
        vec![
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::User,
            MessageRole::Assistant,
        ]
    );
}

#[tokio::test]
async fn switch_conversation_to_an_unknown_id_is_an_error() {
    let service = Arc::new(MockVectorService::new());
    let manager = connected_manager(&service).await;
    let original = manager
        .current_conversation()
        .await
        .expect("initialization should open a conversation");

    let err = manager
        .switch_conversation("nonexistent")
        .await
        .expect_err("switching to an unknown conversation should fail");
    match err {
        ChatError::ConversationNotFound(id) => assert_eq!(id, "nonexistent"),
        other => panic!("unexpected error variant: {other:?}"),
    }
    assert_eq!(
        manager
            .current_conversation()
            .await
            .expect("a conversation should stay active")
            .id,
        original.id
    );

    let second = manager.start_new_conversation().await;
    assert_eq!(
        manager
            .current_conversation()
            .await
            .expect("the new conversation should be current")
            .id,
        second.id
    );

    manager
        .switch_conversation(&original.id)
        .await
        .expect("switching back should succeed");
    assert_eq!(
        manager
            .current_conversation()
            .await
            .expect("the original conversation should be current again")
            .id,
        original.id
    );
    assert_eq!(manager.conversations().await.len(), 2);
}

#[tokio::test]
async fn auto_save_persists_the_conversation_after_each_exchange() {
    let service = Arc::new(MockVectorService::new());
    let manager =
        connected_manager_with(&service, ChatManagerParams::new(service.clone())).await;
    service
        .enqueue_generate(Ok(rag_response("saved reply", Vec::new())))
        .enqueue_save(Ok(()));

    manager
        .send_message("please persist this")
        .await
        .expect("exchange should succeed");

    let saves = service.tracked_saves();
    assert_eq!(saves.len(), 1);
    let current = manager
        .current_conversation()
        .await
        .expect("a conversation should be active");
    assert_eq!(saves[0].conversation_id, current.id);
    assert_eq!(saves[0].messages.len(), 2);
    assert_eq!(saves[0].messages[0].content, "please persist this");
    assert_eq!(saves[0].messages[1].content, "saved reply");
}

#[tokio::test]
async fn auto_save_failures_never_fail_the_exchange() {
    let service = Arc::new(MockVectorService::new());
    let manager =
        connected_manager_with(&service, ChatManagerParams::new(service.clone())).await;
    service
        .enqueue_generate(Ok(rag_response("reply", Vec::new())))
        .enqueue_save(Err(VectorServiceError::Invariant(
            "save rejected".to_string(),
        )));

    let exchange = manager
        .send_message("still fine")
        .await
        .expect("exchange should survive a failed save");

    assert!(exchange.generation_error.is_none());
    assert_eq!(service.tracked_saves().len(), 1);
}

#[tokio::test]
async fn knowledge_mutations_go_through_the_gateway_and_refresh_the_mirror() {
    let service = Arc::new(MockVectorService::new());
    let manager = connected_manager(&service).await;

    service.enqueue_add(Ok("k2".to_string())).enqueue_list(Ok(vec![
        entry("k1", "existing entry"),
        entry("k2", "embeddings map text to vectors"),
    ]));
    let id = manager
        .add_knowledge(
            "embeddings map text to vectors",
            &KnowledgeMetadata::new().with_topic("AI"),
        )
        .await
        .expect("add should succeed");
    assert_eq!(id, "k2");
    assert_eq!(manager.knowledge().await.len(), 2);

    let adds = service.tracked_adds();
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0].text, "embeddings map text to vectors");
    assert_eq!(adds[0].metadata.topic.as_deref(), Some("AI"));

    service
        .enqueue_delete(Ok(()))
        .enqueue_list(Ok(vec![entry("k2", "embeddings map text to vectors")]));
    manager
        .delete_knowledge("k1")
        .await
        .expect("delete should succeed");
    assert_eq!(service.tracked_deletes(), vec!["k1".to_string()]);

    let knowledge = manager.knowledge().await;
    assert_eq!(knowledge.len(), 1);
    assert_eq!(knowledge[0].id, "k2");
}

#[tokio::test]
async fn failed_refresh_keeps_the_previous_mirror() {
    let service = Arc::new(MockVectorService::new());
    let manager = connected_manager(&service).await;

    service
        .enqueue_update(Ok(()))
        .enqueue_list(Err(VectorServiceError::Invariant(
            "listing offline".to_string(),
        )));
    manager
        .update_knowledge("k1", "updated text", &KnowledgeMetadata::new())
        .await
        .expect("update should succeed even when the refresh fails");

    let knowledge = manager.knowledge().await;
    assert_eq!(knowledge.len(), 1);
    assert_eq!(knowledge[0].id, "k1");
}

#[tokio::test]
async fn search_conversations_uses_the_configured_result_count() {
    let service = Arc::new(MockVectorService::new());
    let manager = connected_manager_with(
        &service,
        ChatManagerParams::new(service.clone())
            .auto_save(false)
            .search_k(5),
    )
    .await;

    service.enqueue_conversation_search(Ok(Vec::new()));
    manager
        .search_conversations("earlier discussion")
        .await
        .expect("conversation search should succeed");
    let searches = service.tracked_conversation_searches();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].query, "earlier discussion");
    assert_eq!(searches[0].k, 5);

    service.enqueue_knowledge_search(Ok(Vec::new()));
    manager
        .search_knowledge("vectors", 3)
        .await
        .expect("knowledge search should succeed");
    assert_eq!(service.tracked_knowledge_searches()[0].k, 3);
}

#[tokio::test]
async fn connectivity_watchers_observe_initialization() {
    let service = Arc::new(MockVectorService::new());
    let manager = ChatManager::new(ChatManagerParams::new(service.clone()).auto_save(false));
    let mut receiver = manager.subscribe_connectivity();
    assert_eq!(*receiver.borrow(), ConnectivityState::Unknown);

    service
        .enqueue_health(Ok(HealthStatus::healthy()))
        .enqueue_list(Ok(vec![entry("k1", "existing entry")]));
    manager.initialize().await;

    assert!(receiver
        .has_changed()
        .expect("connectivity channel should stay open"));
    assert_eq!(*receiver.borrow_and_update(), ConnectivityState::Connected);
}
