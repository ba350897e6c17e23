use classroom_core::ClassroomError;
use classroom_core::api::ClassroomApi;
use classroom_interaction::HttpClassroomApi;
use std::collections::HashMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the stub server saw for one request.
#[derive(Debug)]
struct Recorded {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: String,
}

impl Recorded {
    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Serves exactly one request with the given status and JSON body.
async fn serve_once(status: u16, response_body: &'static str) -> (String, JoinHandle<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.split("\r\n");
        let mut request_line = lines.next().unwrap().split(' ');
        let method = request_line.next().unwrap().to_string();
        let path = request_line.next().unwrap().to_string();
        let headers: HashMap<String, String> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        let content_length: usize = headers
            .get("content-length")
            .map(|v| v.parse().unwrap())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            response_body.len(),
            response_body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        Recorded {
            method,
            path,
            headers,
            body,
        }
    });

    (format!("http://{}/api", addr), handle)
}

fn api_for(base: &str, api_key: Option<String>) -> HttpClassroomApi {
    // Bypass any proxy configured in the environment; the stub is local
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpClassroomApi::with_client(client, base, api_key).unwrap()
}

const USER_U1: &str = r#"{ "_id": "u1", "email": "a@b.com", "firstname": "A", "role": "user" }"#;

#[tokio::test]
async fn test_sign_in_sends_credentials_without_bearer() {
    let (base, server) = serve_once(
        200,
        r#"{ "data": { "token": "T", "_id": "u1", "email": "a@b.com" } }"#,
    )
    .await;
    let api = api_for(&base, Some("key-123".to_string()));

    let sign_in = api.sign_in("a@b.com", "x").await.unwrap();
    assert_eq!(sign_in.token, "T");
    assert_eq!(sign_in.user.id, "u1");

    let recorded = server.await.unwrap();
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.path, "/api/classroom/signin");
    assert_eq!(recorded.headers.get("x-api-key").map(String::as_str), Some("key-123"));
    assert!(!recorded.headers.contains_key("authorization"));
    assert_eq!(
        recorded.json(),
        serde_json::json!({ "email": "a@b.com", "password": "x" })
    );
}

#[tokio::test]
async fn test_sign_in_rejection_is_authentication_error() {
    let (base, server) = serve_once(401, r#"{ "message": "Invalid email or password" }"#).await;
    let api = api_for(&base, None);

    let err = api.sign_in("a@b.com", "wrong").await.unwrap_err();
    match err {
        ClassroomError::Authentication(message) => {
            assert!(message.contains("Invalid email or password"))
        }
        other => panic!("Expected Authentication error, got {:?}", other),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_sign_in_without_token_is_unusable() {
    let (base, server) = serve_once(200, r#"{ "data": { "_id": "u1", "email": "a@b.com" } }"#).await;
    let api = api_for(&base, None);

    let err = api.sign_in("a@b.com", "x").await.unwrap_err();
    assert!(err.is_authentication());
    assert!(err.to_string().contains("usable session"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_current_user_sends_bearer() {
    let (base, server) = serve_once(200, USER_U1).await;
    let api = api_for(&base, None);

    let user = api.current_user("T").await.unwrap();
    assert_eq!(user.id, "u1");

    let recorded = server.await.unwrap();
    assert_eq!(recorded.method, "GET");
    assert_eq!(recorded.path, "/api/profile");
    assert_eq!(
        recorded.headers.get("authorization").map(String::as_str),
        Some("Bearer T")
    );
    assert!(!recorded.headers.contains_key("x-api-key"));
}

#[tokio::test]
async fn test_class_members_path() {
    let (base, server) = serve_once(200, r#"{ "data": [ { "_id": "u1", "email": "a@b.com" }, { "_id": "u2", "email": "c@d.com" } ] }"#).await;
    let api = api_for(&base, None);

    let members = api.class_members("2565", "T").await.unwrap();
    assert_eq!(members.len(), 2);

    let recorded = server.await.unwrap();
    assert_eq!(recorded.path, "/api/classroom/class/2565");
}

#[tokio::test]
async fn test_list_posts_failure_is_fetch_error() {
    let (base, server) = serve_once(500, r#"{ "message": "boom" }"#).await;
    let api = api_for(&base, None);

    let err = api.list_posts("T").await.unwrap_err();
    assert!(err.is_fetch());
    assert!(err.to_string().contains("boom"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_list_posts_malformed_is_fetch_error() {
    let (base, server) = serve_once(200, r#"{ "data": { "not": "a list" } }"#).await;
    let api = api_for(&base, None);

    let err = api.list_posts("T").await.unwrap_err();
    assert!(err.is_fetch());
    server.await.unwrap();
}

#[tokio::test]
async fn test_create_post_body() {
    let (base, server) = serve_once(
        201,
        r#"{ "data": {
            "_id": "p9",
            "content": "hello class",
            "createdAt": "2024-01-02T00:00:00Z",
            "createdBy": { "_id": "u1", "email": "a@b.com" },
            "like": [],
            "comment": []
        } }"#,
    )
    .await;
    let api = api_for(&base, None);

    api.create_post("hello class", "T").await.unwrap();

    let recorded = server.await.unwrap();
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.path, "/api/classroom/status");
    assert_eq!(recorded.json(), serde_json::json!({ "content": "hello class" }));
}

#[tokio::test]
async fn test_create_post_accepts_unpopulated_author() {
    let (base, server) = serve_once(
        201,
        r#"{ "data": {
            "_id": "p9",
            "content": "hi",
            "createdAt": "2024-01-02T00:00:00Z",
            "createdBy": "u1",
            "like": [],
            "comment": []
        } }"#,
    )
    .await;
    let api = api_for(&base, None);

    api.create_post("hi", "T").await.unwrap();
    server.await.unwrap();
}

#[tokio::test]
async fn test_create_post_accepts_body_without_data() {
    let (base, server) = serve_once(201, r#"{ "message": "created" }"#).await;
    let api = api_for(&base, None);

    api.create_post("hi", "T").await.unwrap();
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_feed_error_names_the_field() {
    let (base, server) = serve_once(
        200,
        r#"{ "data": [ { "_id": "p1", "createdAt": "2024-01-01T00:00:00Z", "createdBy": { "_id": "u1" } } ] }"#,
    )
    .await;
    let api = api_for(&base, None);

    let err = api.list_posts("T").await.unwrap_err();
    assert!(err.is_fetch());
    assert!(err.user_message().contains("missing field `content`"), "{}", err);
    server.await.unwrap();
}

#[tokio::test]
async fn test_like_and_unlike_shapes() {
    let (base, server) = serve_once(200, r#"{ "data": null }"#).await;
    let api = api_for(&base, None);
    api.like("p1", "T").await.unwrap();
    let recorded = server.await.unwrap();
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.path, "/api/classroom/like");
    assert_eq!(recorded.json(), serde_json::json!({ "statusId": "p1" }));

    let (base, server) = serve_once(200, r#"{}"#).await;
    let api = api_for(&base, None);
    api.unlike("p1", "T").await.unwrap();
    let recorded = server.await.unwrap();
    assert_eq!(recorded.method, "DELETE");
    assert_eq!(recorded.path, "/api/classroom/like");
    assert_eq!(recorded.json(), serde_json::json!({ "statusId": "p1" }));
}

#[tokio::test]
async fn test_comment_shapes() {
    let (base, server) = serve_once(200, r#"{}"#).await;
    let api = api_for(&base, None);
    api.add_comment("p1", "nice", "T").await.unwrap();
    let recorded = server.await.unwrap();
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.path, "/api/classroom/comment");
    assert_eq!(
        recorded.json(),
        serde_json::json!({ "statusId": "p1", "content": "nice" })
    );

    let (base, server) = serve_once(200, r#"{}"#).await;
    let api = api_for(&base, None);
    api.delete_comment("p1", "c7", "T").await.unwrap();
    let recorded = server.await.unwrap();
    assert_eq!(recorded.method, "DELETE");
    assert_eq!(recorded.path, "/api/classroom/comment/c7");
    assert_eq!(recorded.json(), serde_json::json!({ "statusId": "p1" }));
}

#[tokio::test]
async fn test_delete_post_rejection_is_mutation_error() {
    let (base, server) = serve_once(403, r#"{ "message": "You can only delete your own post" }"#).await;
    let api = api_for(&base, None);

    let err = api.delete_post("p1", "T").await.unwrap_err();
    assert!(err.is_mutation());
    assert!(err.user_message().contains("your own post"));

    let recorded = server.await.unwrap();
    assert_eq!(recorded.method, "DELETE");
    assert_eq!(recorded.path, "/api/classroom/status/p1");
}
