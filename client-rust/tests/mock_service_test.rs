use rag_client::{
    rag_client_test::{MockVectorService, SearchCall},
    HealthStatus, KnowledgeEntry, KnowledgeItem, KnowledgeMatch, KnowledgeMetadata, Message,
    RagResponse, VectorService, VectorServiceError,
};

fn knowledge_match(id: &str, text: &str, similarity: f64) -> KnowledgeMatch {
    KnowledgeMatch {
        id: id.to_string(),
        text: text.to_string(),
        metadata: KnowledgeMetadata::default(),
        similarity,
    }
}

fn rag_response(text: &str) -> RagResponse {
    RagResponse {
        response: text.to_string(),
        contexts: Vec::new(),
    }
}

#[tokio::test]
async fn mock_vector_service_tracks_generate_calls_and_returns_results() {
    let service = MockVectorService::new();

    let response1 = rag_response("Hello, world!");
    let response3 = rag_response("Goodbye, world!");

    service
        .enqueue_generate(Ok(response1.clone()))
        .enqueue_generate(Err(VectorServiceError::InvalidInput(
            "generate error".to_string(),
        )))
        .enqueue_generate(Ok(response3.clone()));

    let history = vec![Message::user("Hi")];
    let res1 = service
        .generate_response("Hi", &history)
        .await
        .expect("first generate should succeed");
    assert_eq!(res1, response1);
    let tracked = service.tracked_generates();
    assert_eq!(tracked.len(), 1);
    assert_eq!(tracked[0].query, "Hi");
    assert_eq!(tracked[0].conversation_history, history);

    let err = service
        .generate_response("Error", &[])
        .await
        .expect_err("second generate should error");
    match err {
        VectorServiceError::InvalidInput(msg) => assert_eq!(msg, "generate error"),
        other => panic!("unexpected error variant: {other:?}"),
    }
    assert_eq!(service.tracked_generates().len(), 2);

    let res3 = service
        .generate_response("Goodbye", &[])
        .await
        .expect("third generate should succeed");
    assert_eq!(res3, response3);
    assert_eq!(service.tracked_generates().len(), 3);

    service.reset();
    assert!(service.tracked_generates().is_empty());

    service.enqueue_generate(Ok(rag_response("After reset")));

    service.restore();
    assert!(service.tracked_generates().is_empty());

    let err = service
        .generate_response("Hi", &[])
        .await
        .expect_err("generate after restore should fail");
    match err {
        VectorServiceError::Invariant(message) => {
            assert_eq!(message, "no mocked generate_response results available");
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn mock_vector_service_serves_search_results_in_order() {
    let service = MockVectorService::new();

    let first = vec![knowledge_match("a", "What is RAG?", 0.9)];
    let second = vec![
        knowledge_match("b", "Vector databases", 0.8),
        knowledge_match("c", "Embeddings", 0.7),
    ];

    service
        .enqueue_knowledge_search(Ok(first.clone()))
        .enqueue_knowledge_search(Ok(second.clone()));

    let res1 = service
        .search_knowledge("rag", 3)
        .await
        .expect("first search should succeed");
    assert_eq!(res1, first);

    let res2 = service
        .search_knowledge("vectors", 5)
        .await
        .expect("second search should succeed");
    assert_eq!(res2, second);

    assert_eq!(
        service.tracked_knowledge_searches(),
        vec![
            SearchCall {
                query: "rag".to_string(),
                k: 3,
            },
            SearchCall {
                query: "vectors".to_string(),
                k: 5,
            },
        ]
    );
}

#[tokio::test]
async fn mock_vector_service_tracks_knowledge_mutations() {
    let service = MockVectorService::new();

    service
        .enqueue_add(Ok("id-1".to_string()))
        .enqueue_update(Ok(()))
        .enqueue_delete(Ok(()))
        .enqueue_batch_add(Ok(2));

    let metadata = KnowledgeMetadata::new().with_topic("AI").with_confidence(0.9);
    let id = service
        .add_knowledge("What is RAG?", &metadata)
        .await
        .expect("add should succeed");
    assert_eq!(id, "id-1");

    service
        .update_knowledge(&id, "What is RAG, really?", &metadata)
        .await
        .expect("update should succeed");
    service
        .delete_knowledge(&id)
        .await
        .expect("delete should succeed");

    let items = vec![KnowledgeItem::new("one"), KnowledgeItem::new("two")];
    let added = service
        .batch_add_knowledge(&items)
        .await
        .expect("batch add should succeed");
    assert_eq!(added, 2);

    let adds = service.tracked_adds();
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0].text, "What is RAG?");
    assert_eq!(adds[0].metadata.topic.as_deref(), Some("AI"));

    let updates = service.tracked_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, "id-1");
    assert_eq!(updates[0].text, "What is RAG, really?");

    assert_eq!(service.tracked_deletes(), vec!["id-1".to_string()]);
    assert_eq!(service.tracked_batch_adds(), vec![items]);
}

#[tokio::test]
async fn mock_vector_service_counts_health_and_list_calls() {
    let service = MockVectorService::new();

    service
        .enqueue_health(Ok(HealthStatus::healthy()))
        .enqueue_health(Ok(HealthStatus::unhealthy("vector db down")))
        .enqueue_list(Ok(vec![KnowledgeEntry {
            id: "a".to_string(),
            text: "What is RAG?".to_string(),
            metadata: KnowledgeMetadata::default(),
        }]));

    let healthy = service
        .check_health()
        .await
        .expect("first health check should succeed");
    assert!(healthy.vector_db_connected);

    let unhealthy = service
        .check_health()
        .await
        .expect("second health check should succeed");
    assert!(!unhealthy.vector_db_connected);
    assert_eq!(unhealthy.error.as_deref(), Some("vector db down"));

    let entries = service
        .list_knowledge()
        .await
        .expect("list should succeed");
    assert_eq!(entries.len(), 1);

    assert_eq!(service.tracked_health_checks(), 2);
    assert_eq!(service.tracked_list_calls(), 1);
}
