use dotenvy::dotenv;
use rag_client::{KnowledgeMetadata, RagVectorClient, VectorService, DEFAULT_BASE_URL};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let base_url = std::env::var("RAG_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let client = RagVectorClient::new().with_base_url(base_url);

    let health = client.check_health().await.unwrap();
    println!(
        "service is {} (vector db connected: {})",
        health.status, health.vector_db_connected
    );

    let id = client
        .add_knowledge(
            "Retrieval-Augmented Generation (RAG) combines retrieval with text generation.",
            &KnowledgeMetadata::new()
                .with_topic("AI")
                .with_confidence(0.95),
        )
        .await
        .unwrap();
    println!("added knowledge entry {id}");

    let matches = client.search_knowledge("What is RAG?", 3).await.unwrap();
    for hit in matches {
        println!("{:.2} {}", hit.similarity, hit.text);
    }
}
