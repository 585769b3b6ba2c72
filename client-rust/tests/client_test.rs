use rag_client::{RagVectorClient, DEFAULT_BASE_URL};

#[test]
fn new_points_at_the_default_service_address() {
    let client = RagVectorClient::new();
    assert_eq!(client.base_url(), DEFAULT_BASE_URL);
}

#[test]
fn with_base_url_points_an_existing_client_elsewhere() {
    let client = RagVectorClient::new().with_base_url("http://rag.internal:9000");
    assert_eq!(client.base_url(), "http://rag.internal:9000");
}

#[test]
fn with_base_url_strips_a_trailing_slash() {
    let client = RagVectorClient::new().with_base_url(format!("{DEFAULT_BASE_URL}/"));
    assert_eq!(client.base_url(), DEFAULT_BASE_URL);
}
