use memchat::config::MemoryConfig;
use memchat::error::ServiceError;
use memchat::memory::client::HostedMemoryClient;
use memchat::memory::MemoryStore;
use memchat::message::Message;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, page_size: usize) -> HostedMemoryClient {
    HostedMemoryClient::new(&MemoryConfig {
        base_url: server.uri(),
        api_key: Some("m0-test".into()),
        page_size,
        ..MemoryConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn search_posts_query_and_reads_results_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/memories/search/"))
        .and(header("authorization", "Token m0-test"))
        .and(body_json(json!({"query": "color", "user_id": "alice", "limit": 8})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "m1", "memory": "Favorite color is blue", "score": 0.91},
                {"id": "m2", "memory": "Dislikes orange", "score": 0.44}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = client(&server, 100).search("color", "alice", 8).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].memory, "Favorite color is blue");
    assert_eq!(results[0].id.as_deref(), Some("m1"));
    assert_eq!(results[1].score, Some(0.44));
}

#[tokio::test]
async fn search_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/memories/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"memory": "Lives in Oslo"}
        ])))
        .mount(&server)
        .await;

    let results = client(&server, 100).search("where", "alice", 8).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].memory, "Lives in Oslo");
}

#[tokio::test]
async fn list_all_follows_pages_until_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/memories/"))
        .and(query_param("user_id", "alice"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": "page-2",
            "results": [{"memory": "a"}, {"memory": "b"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/memories/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": null,
            "results": [{"memory": "c"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client(&server, 2).list_all("alice", 10).await.unwrap();

    let memories: Vec<&str> = listing.records.iter().map(|r| r.memory.as_str()).collect();
    assert_eq!(memories, vec!["a", "b", "c"]);
    assert!(!listing.truncated);
}

#[tokio::test]
async fn list_all_stops_at_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/memories/"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next": "page-2",
            "results": [{"memory": "a"}, {"memory": "b"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client(&server, 2).list_all("alice", 2).await.unwrap();

    assert_eq!(listing.records.len(), 2);
    assert!(listing.truncated);
}

#[tokio::test]
async fn list_all_truncates_unpaginated_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/memories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"memory": "a"}, {"memory": "b"}, {"memory": "c"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client(&server, 100).list_all("alice", 2).await.unwrap();

    assert_eq!(listing.records.len(), 2);
    assert!(listing.truncated);
}

#[tokio::test]
async fn add_posts_messages_for_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/memories/"))
        .and(header("authorization", "Token m0-test"))
        .and(body_json(json!({
            "messages": [
                {"role": "user", "content": "My favorite color is blue"},
                {"role": "assistant", "content": "Noted!"}
            ],
            "user_id": "alice"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "m1", "event": "ADD"}])))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, 100)
        .add(
            &[
                Message::user("My favorite color is blue"),
                Message::assistant("Noted!"),
            ],
            "alice",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn http_errors_are_typed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/memories/search/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/memories/"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
        .mount(&server)
        .await;

    let c = client(&server, 100);

    let err = c.search("q", "alice", 8).await.unwrap_err();
    assert!(
        matches!(err, ServiceError::Authentication { status: 401, ref message, .. } if message == "Invalid token")
    );

    let err = c.add(&[Message::user("hi")], "alice").await.unwrap_err();
    assert!(matches!(err, ServiceError::RateLimited { retry_after: Some(d), .. } if d.as_secs() == 3));
}

#[tokio::test]
async fn unreachable_store_is_a_connectivity_error() {
    // Bind then drop a listener so the port is closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let c = HostedMemoryClient::new(&MemoryConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        ..MemoryConfig::default()
    })
    .unwrap();

    let err = c.search("q", "alice", 8).await.unwrap_err();
    assert!(matches!(err, ServiceError::Connectivity { .. }));
}

#[tokio::test]
async fn garbage_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/memories/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server, 100).search("q", "alice", 8).await.unwrap_err();
    assert!(matches!(err, ServiceError::Malformed { .. }));
}
