//! End-to-end flows through the reqwest transport against a mock backend.

use serde_json::{Map, Value, json};
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskqueue_client::{QueueClient, QueueError, ReqwestTransport, TaskDescriptor};
use taskqueue_config::BackendConfig;

fn client_for(server: &MockServer) -> QueueClient {
    let transport = ReqwestTransport::new(&BackendConfig::default()).unwrap();
    let mut client = QueueClient::new("test", transport).with_base_url(server.uri());
    client.set_auth("app", "ak", "sk", None);
    client
}

#[tokio::test]
async fn test_push_single_task() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/taskqueue/index.php"))
        .and(header("x-sae-accesskey", "ak"))
        .and(header_exists("x-sae-timestamp"))
        .and(header_exists("authorization"))
        .and(body_string_contains("taskqueue="))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"errno":0,"errmsg":"OK","data":42}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client
        .add_task("/x.php", Some(b"a=1".as_slice()), false, &Map::new())
        .unwrap();

    let reply = client.push().await.unwrap();
    assert_eq!(reply.message, "OK");
    assert_eq!(reply.data, Some(json!(42)));
    assert!(client.batch().is_empty());
    assert_eq!(client.last_error_code(), 0);
}

#[tokio::test]
async fn test_push_sends_batch_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"errno":0,"errmsg":"OK"}"#))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let tasks = vec![
        TaskDescriptor::new("/page3.php").with_post_data("act=test"),
        TaskDescriptor::new("/page4.php").with_priority(true).with_delay(5),
    ];
    client.add_task(tasks, None, false, &Map::new()).unwrap();
    client.push().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let decoded = url::form_urlencoded::parse(&requests[0].body)
        .find(|(k, _)| k == "taskqueue")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    let sent: Value = serde_json::from_str(&decoded).unwrap();
    assert_eq!(
        sent,
        json!({
            "name": "test",
            "queue": [
                {"url": "http://app.applinzi.com/page3.php", "postdata": "YWN0PXRlc3Q="},
                {"url": "http://app.applinzi.com/page4.php", "prior": true, "delay": 5}
            ]
        })
    );
}

#[tokio::test]
async fn test_error_header_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).insert_header("TaskQueueError", "3,queue not found"))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.add_task("/x.php", None, false, &Map::new()).unwrap();

    let err = client.push().await.unwrap_err();
    assert_eq!(err.code(), 3);
    assert_eq!(client.last_error_code(), 3);
    assert_eq!(client.last_error_message(), "queue not found");
}

#[tokio::test]
async fn test_error_header_with_utf8_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).insert_header("TaskQueueError", "11,队列已满"))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.add_task("/x.php", None, false, &Map::new()).unwrap();

    let err = client.push().await.unwrap_err();
    assert_eq!(
        err,
        QueueError::Backend {
            code: 11,
            message: "队列已满".to_string()
        }
    );
    assert_eq!(client.last_error_code(), 11);
    assert_eq!(client.last_error_message(), "队列已满");
}

#[tokio::test]
async fn test_backend_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"errno":5,"errmsg":"queue is full"}"#),
        )
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.add_task("/x.php", None, false, &Map::new()).unwrap();

    let err = client.push().await.unwrap_err();
    assert_eq!(
        err,
        QueueError::Backend {
            code: 5,
            message: "queue is full".to_string()
        }
    );
    assert_eq!(client.last_error_message(), "queue is full");
}

#[tokio::test]
async fn test_non_200_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.add_task("/x.php", None, false, &Map::new()).unwrap();

    let err = client.push().await.unwrap_err();
    assert_eq!(err.code(), 500);
    assert!(client.last_error_message().contains("http code: 502"));
}

#[tokio::test]
async fn test_length_queries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("act=curlen"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"errno":0,"errmsg":"OK","data":7}"#))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("act=leftlen"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"errno":0,"errmsg":"OK","data":"993"}"#),
        )
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    assert_eq!(client.current_length().await.unwrap(), 7);
    assert_eq!(client.remaining_length().await.unwrap(), 993);
}

#[tokio::test]
async fn test_empty_batch_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let err = client.push().await.unwrap_err();
    assert_eq!(err, QueueError::EmptyQueue);
    assert_eq!(client.last_error_message(), "The queue is empty.");
}
