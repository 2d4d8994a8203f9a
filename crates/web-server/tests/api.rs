mod support;

use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use support::{FailingStorage, TestServer};

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> Value {
    let res = client.post(url).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

async fn post_raw(client: &reqwest::Client, url: String, body: &'static str) -> Value {
    let res = client
        .post(url)
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

async fn get_json(client: &reqwest::Client, url: String) -> Value {
    let res = client.get(url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

const ROUTES: [&str; 5] =
    ["/register/enterprise", "/register/event", "/register/user", "/api/posts", "/api/comments"];

fn data_len(body: &Value) -> usize {
    body["data"].as_array().expect("data is a list").len()
}

#[tokio::test]
async fn register_then_list_enterprise() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = post_json(&client, srv.url("/register/enterprise"), json!({ "name": "Acme" })).await;
    assert_eq!(body, json!({ "status": "OK" }));

    let body = get_json(&client, srv.url("/register/enterprise")).await;
    assert_eq!(body, json!({ "status": "OK", "data": [{ "id": 1, "name": "Acme" }] }));
}

#[tokio::test]
async fn empty_tables_list_as_empty_data() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ROUTES {
        let body = get_json(&client, srv.url(path)).await;
        assert_eq!(body, json!({ "status": "OK", "data": [] }), "GET {path}");
    }
}

#[tokio::test]
async fn empty_body_is_reported_on_every_create_route() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ROUTES {
        let body = post_raw(&client, srv.url(path), "").await;
        assert_eq!(body, json!({ "status": "Error", "error": "empty request" }), "POST {path}");
    }
}

#[tokio::test]
async fn malformed_body_is_an_invalid_format() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = post_raw(&client, srv.url("/register/event"), "{\"name\": ").await;
    assert_eq!(body, json!({ "status": "Error", "error": "invalid request format" }));

    let payload = r#"{"content":"x","event_id":"five"}"#;
    let body = post_raw(&client, srv.url("/api/posts"), payload).await;
    assert_eq!(body, json!({ "status": "Error", "error": "invalid request format" }));
}

#[tokio::test]
async fn post_with_empty_content_is_invalid_data() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let payload = json!({ "content": "", "event_id": 5 });
    let body = post_json(&client, srv.url("/api/posts"), payload).await;
    assert_eq!(body, json!({ "status": "Error", "error": "invalid data provided" }));

    let posts = get_json(&client, srv.url("/api/posts")).await;
    assert_eq!(data_len(&posts), 0);
}

#[tokio::test]
async fn validation_failures_create_nothing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let cases = [
        ("/register/enterprise", json!({ "name": "" })),
        ("/register/event", json!({ "name": "Launch", "description": "", "enterprise_id": 1 })),
        ("/register/event", json!({ "name": "Launch", "description": "x", "enterprise_id": 0 })),
        ("/register/user", json!({ "event_id": -1, "name": "Ann" })),
        ("/register/user", json!({ "name": "Ann" })),
        ("/api/comments", json!({ "post_id": 1, "participant_id": 0, "content": "hi" })),
    ];
    for (path, payload) in cases {
        let body = post_json(&client, srv.url(path), payload.clone()).await;
        assert_eq!(
            body,
            json!({ "status": "Error", "error": "invalid data provided" }),
            "POST {path} {payload}"
        );
    }

    for path in ["/register/enterprise", "/register/event", "/register/user", "/api/comments"] {
        assert_eq!(data_len(&get_json(&client, srv.url(path)).await), 0, "GET {path}");
    }
}

#[tokio::test]
async fn comment_on_missing_post_is_a_storage_failure() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = post_json(
        &client,
        srv.url("/api/comments"),
        json!({ "post_id": 1, "participant_id": 1, "content": "hi" }),
    )
    .await;
    assert_eq!(body, json!({ "status": "Error", "error": "failed to create comment" }));
}

#[tokio::test]
async fn event_for_missing_enterprise_is_a_storage_failure() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = post_json(
        &client,
        srv.url("/register/event"),
        json!({ "name": "Launch", "description": "Product launch", "enterprise_id": 42 }),
    )
    .await;
    assert_eq!(body, json!({ "status": "Error", "error": "failed to register event" }));
}

#[tokio::test]
async fn children_of_missing_events_are_storage_failures() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let payload = json!({ "event_id": 9, "name": "Ann" });
    let body = post_json(&client, srv.url("/register/user"), payload).await;
    assert_eq!(body, json!({ "status": "Error", "error": "failed to register user" }));

    let payload = json!({ "content": "x", "event_id": 9 });
    let body = post_json(&client, srv.url("/api/posts"), payload).await;
    assert_eq!(body, json!({ "status": "Error", "error": "failed to create post" }));

    assert_eq!(data_len(&get_json(&client, srv.url("/register/user")).await), 0);
    assert_eq!(data_len(&get_json(&client, srv.url("/api/posts")).await), 0);
}

#[tokio::test]
async fn storage_outage_names_the_failed_action() {
    let srv = TestServer::spawn_with(
        Arc::new(FailingStorage),
        Duration::from_secs(5),
        Duration::from_secs(10),
    )
    .await;
    let client = reqwest::Client::new();

    let reads = [
        ("/register/enterprise", "failed to get enterprises"),
        ("/register/event", "failed to get events"),
        ("/register/user", "failed to get users"),
        ("/api/posts", "failed to get posts"),
        ("/api/comments", "failed to get comments"),
    ];
    for (path, message) in reads {
        let body = get_json(&client, srv.url(path)).await;
        assert_eq!(body, json!({ "status": "Error", "error": message }), "GET {path}");
    }

    let writes = [
        ("/register/enterprise", json!({ "name": "Acme" }), "failed to register enterprise"),
        (
            "/register/event",
            json!({ "name": "Launch", "description": "x", "enterprise_id": 1 }),
            "failed to register event",
        ),
        ("/register/user", json!({ "event_id": 1, "name": "Ann" }), "failed to register user"),
        ("/api/posts", json!({ "content": "x", "event_id": 1 }), "failed to create post"),
        (
            "/api/comments",
            json!({ "post_id": 1, "participant_id": 1, "content": "hi" }),
            "failed to create comment",
        ),
    ];
    for (path, payload, message) in writes {
        let body = post_json(&client, srv.url(path), payload).await;
        assert_eq!(body, json!({ "status": "Error", "error": message }), "POST {path}");
    }
}

#[tokio::test]
async fn null_body_is_invalid_data() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = post_raw(&client, srv.url("/register/enterprise"), "null").await;
    assert_eq!(body, json!({ "status": "Error", "error": "invalid data provided" }));
}

#[tokio::test]
async fn identical_creates_make_two_rows() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let payload = json!({ "name": "Acme" });
        let body = post_json(&client, srv.url("/register/enterprise"), payload).await;
        assert_eq!(body["status"], "OK");
    }

    let body = get_json(&client, srv.url("/register/enterprise")).await;
    assert_eq!(
        body["data"],
        json!([{ "id": 1, "name": "Acme" }, { "id": 2, "name": "Acme" }])
    );
}

#[tokio::test]
async fn full_registration_and_content_flow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let steps = [
        ("/register/enterprise", json!({ "name": "Acme" })),
        (
            "/register/event",
            json!({ "name": "Launch", "description": "Product launch", "enterprise_id": 1 }),
        ),
        ("/register/user", json!({ "event_id": 1, "name": "Ann" })),
        ("/api/posts", json!({ "content": "Welcome!", "event_id": 1 })),
        ("/api/comments", json!({ "post_id": 1, "participant_id": 1, "content": "hi" })),
    ];
    for (path, payload) in steps {
        let before = data_len(&get_json(&client, srv.url(path)).await);
        let body = post_json(&client, srv.url(path), payload).await;
        assert_eq!(body, json!({ "status": "OK" }), "POST {path}");
        let after = data_len(&get_json(&client, srv.url(path)).await);
        assert_eq!(after, before + 1, "GET {path}");
    }

    let events = get_json(&client, srv.url("/register/event")).await;
    let event = &events["data"][0];
    assert_eq!(event["enterprise_id"], 1);
    assert_eq!(event["description"], "Product launch");
    assert!(event["created_at"].is_string());

    let users = get_json(&client, srv.url("/register/user")).await;
    assert_eq!(users["data"], json!([{ "id": 1, "event_id": 1, "name": "Ann" }]));

    let comments = get_json(&client, srv.url("/api/comments")).await;
    let comment = &comments["data"][0];
    assert_eq!(comment["post_id"], 1);
    assert_eq!(comment["participant_id"], 1);
    assert_eq!(comment["content"], "hi");
}

#[tokio::test]
async fn health_is_plain_text() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/posts"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me");

    let res = client.get(srv.url("/api/posts")).send().await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn cors_preflight_allows_the_configured_origin() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .request(reqwest::Method::OPTIONS, srv.url("/api/posts"))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["access-control-allow-origin"], "http://localhost:3000");
    assert_eq!(res.headers()["access-control-allow-credentials"], "true");
}

#[tokio::test]
async fn oversized_body_is_an_invalid_format() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let name = "x".repeat(128 * 1024);
    let body = post_json(&client, srv.url("/register/enterprise"), json!({ "name": name })).await;
    assert_eq!(body, json!({ "status": "Error", "error": "invalid request format" }));
}
