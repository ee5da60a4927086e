//! Backend client tests against a local HTTP responder.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cartbot_core::{ChatTransport, ProductCatalog, Resource};
use cartbot_fetch::{BackendClient, BackendSettings, FetchError, RetryStrategy};
use futures::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A canned route: request line prefix, status line, body.
type Route = (&'static str, &'static str, &'static str);

/// Starts a responder on an ephemeral port and returns its base URL and
/// the raw requests it has seen.
async fn serve(routes: Vec<Route>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_task = seen.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let request = read_request(&mut socket).await;
            seen_task.lock().unwrap().push(request.clone());

            let (status, body) = routes
                .iter()
                .find(|(prefix, _, _)| request.starts_with(prefix))
                .map_or(("404 Not Found", ""), |(_, status, body)| (*status, *body));

            respond(&mut socket, status, "", body).await;
        }
    });

    (format!("http://{addr}/api"), seen)
}

/// One scripted reply for [`serve_sequence`].
#[derive(Clone, Copy)]
enum Reply {
    /// Status line, extra header lines, body.
    Respond(&'static str, &'static str, &'static str),
    /// Read the request, then hold the connection open without answering.
    Stall,
}

/// Starts a responder that answers the n-th connection with the n-th reply,
/// repeating the last one. Returns the base URL and a request counter.
async fn serve_sequence(replies: Vec<Reply>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let count_task = count.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            read_request(&mut socket).await;
            let n = count_task.fetch_add(1, Ordering::SeqCst);
            let reply = replies[n.min(replies.len() - 1)];

            match reply {
                Reply::Respond(status, headers, body) => {
                    respond(&mut socket, status, headers, body).await;
                }
                Reply::Stall => {
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        drop(socket);
                    });
                }
            }
        }
    });

    (format!("http://{addr}/api"), count)
}

async fn respond(socket: &mut TcpStream, status: &str, headers: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n{headers}\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn client(base_url: &str) -> BackendClient {
    let settings = BackendSettings::new(base_url)
        .with_api_token("test-token")
        .with_retry(RetryStrategy::no_retry());
    BackendClient::new(&settings).unwrap()
}

#[tokio::test]
async fn test_send_message_emits_loading_then_reply() {
    let (base, seen) = serve(vec![(
        "POST /api/chat",
        "200 OK",
        r#"{"reply":"Try these <checkout>[{\"id\":\"p1\"}]</checkout>"}"#,
    )])
    .await;

    let notifications: Vec<_> = client(&base).send_message("kettle?").collect().await;

    assert_eq!(notifications.len(), 2);
    assert!(notifications[0].is_loading());
    assert_eq!(
        notifications[1],
        Resource::Success(r#"Try these <checkout>[{"id":"p1"}]</checkout>"#.to_string())
    );

    let requests = seen.lock().unwrap();
    assert!(requests[0].contains(r#"{"message":"kettle?"}"#));
    assert!(requests[0].to_lowercase().contains("authorization: bearer test-token"));
}

#[tokio::test]
async fn test_send_message_server_error_is_terminal_error() {
    let (base, _) = serve(vec![("POST /api/chat", "500 Internal Server Error", "{}")]).await;

    let notifications: Vec<_> = client(&base).send_message("hi").collect().await;

    assert_eq!(notifications.len(), 2);
    let message = notifications[1].error_message().unwrap();
    assert!(message.contains("500"), "unexpected message: {message}");
}

#[tokio::test]
async fn test_product_detail_success() {
    let (base, _) = serve(vec![(
        "GET /api/products/p1 ",
        "200 OK",
        r#"{"id":"p1","name":"Kettle","price":24.5,"currency":"USD"}"#,
    )])
    .await;

    let product = client(&base).get_product("p1").await.unwrap();
    assert_eq!(product.name, "Kettle");
    assert_eq!(product.display_price(), "24.50 USD");
}

#[tokio::test]
async fn test_product_detail_not_found() {
    let (base, _) = serve(vec![]).await;

    let err = client(&base).get_product("missing").await.unwrap_err();
    assert!(matches!(err, FetchError::NotFound(ref what) if what.contains("missing")));

    // The catalog stream ends without a terminal notification
    let notifications: Vec<_> = client(&base).product_detail("missing").collect().await;
    assert_eq!(notifications, vec![Resource::Loading]);
}

#[tokio::test]
async fn test_product_detail_server_error_is_terminal_error() {
    let (base, _) = serve(vec![("GET /api/products/p1 ", "503 Service Unavailable", "")]).await;

    let notifications: Vec<_> = client(&base).product_detail("p1").collect().await;
    assert_eq!(notifications.len(), 2);
    assert!(notifications[1].error_message().unwrap().contains("503"));
}

#[tokio::test]
async fn test_disallowed_domain_never_hits_network() {
    let settings = BackendSettings::new("http://127.0.0.1:9/api")
        .with_allowed_domains(vec!["shop.example.com".to_string()])
        .with_retry(RetryStrategy::no_retry());
    let client = BackendClient::new(&settings).unwrap();

    let err = client.post_chat("hi").await.unwrap_err();
    assert!(matches!(err, FetchError::DomainNotAllowed(host) if host == "127.0.0.1"));
}

fn retrying_client(base_url: &str, retry: RetryStrategy) -> BackendClient {
    let settings = BackendSettings::new(base_url)
        .with_timeout(Duration::from_millis(500))
        .with_retry(retry);
    BackendClient::new(&settings).unwrap()
}

const CHAT_OK: Reply = Reply::Respond("200 OK", "", r#"{"reply":"Hello again"}"#);

#[tokio::test]
async fn test_rate_limited_request_is_retried() {
    let (base, requests) = serve_sequence(vec![
        Reply::Respond("429 Too Many Requests", "", "{}"),
        CHAT_OK,
    ])
    .await;
    let retry = RetryStrategy::new(2).with_base_delay(Duration::from_millis(10));

    let reply = retrying_client(&base, retry).post_chat("hi").await.unwrap();

    assert_eq!(reply, "Hello again");
    assert_eq!(requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_retry_after_is_capped_by_max_delay() {
    let (base, requests) = serve_sequence(vec![
        Reply::Respond("429 Too Many Requests", "Retry-After: 3600\r\n", "{}"),
        CHAT_OK,
    ])
    .await;
    let retry = RetryStrategy::new(2).with_max_delay(Duration::from_millis(50));

    let reply = tokio::time::timeout(
        Duration::from_secs(5),
        retrying_client(&base, retry).post_chat("hi"),
    )
    .await
    .expect("Retry-After should be capped")
    .unwrap();

    assert_eq!(reply, "Hello again");
    assert_eq!(requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_rate_limit_returned_once_attempts_are_exhausted() {
    let (base, requests) = serve_sequence(vec![Reply::Respond(
        "429 Too Many Requests",
        "Retry-After: 1\r\n",
        "{}",
    )])
    .await;
    let retry = RetryStrategy::new(2).with_max_delay(Duration::from_millis(10));

    let err = retrying_client(&base, retry).post_chat("hi").await.unwrap_err();

    assert!(matches!(err, FetchError::RateLimited { retry_after: Some(1) }));
    assert_eq!(requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_timed_out_request_is_retried() {
    let (base, requests) = serve_sequence(vec![Reply::Stall, CHAT_OK]).await;
    let retry = RetryStrategy::new(2).with_base_delay(Duration::from_millis(10));

    let reply = retrying_client(&base, retry).post_chat("hi").await.unwrap();

    assert_eq!(reply, "Hello again");
    assert_eq!(requests.load(Ordering::SeqCst), 2);
}
