// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the Slack store using wiremock.
//!
//! Covers:
//! - Channel lookup with cursor pagination
//! - `ok: false` envelopes and HTTP errors
//! - Missing credentials
//! - Latest snapshot lookup and download
//! - Three-step external upload
//! - A full sync run against the mock API

use std::io::Write;

use envbot::error::{EnvbotError, TokenKind, TransportError};
use envbot::filter::PatternSet;
use envbot::store::slack::{MAX_SNAPSHOT_BYTES, SlackStore};
use envbot::store::{Channel, ChannelStore, SnapshotRef};
use envbot::sync::{SyncOrchestrator, SyncOutcome, SyncRequest};
use serde_json::json;
use wiremock::matchers::{
    body_string_contains, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOT: &str = "xoxb-test";
const USER: &str = "xoxp-test";

fn store(server: &MockServer) -> SlackStore {
    SlackStore::builder()
        .api_url(server.uri())
        .bot_token(BOT)
        .user_token(USER)
        .build()
}

fn channel() -> Channel {
    Channel {
        id: "C01".to_string(),
        name: "backend-envs".to_string(),
        is_private: true,
    }
}

fn ok(body: serde_json::Value) -> ResponseTemplate {
    let mut body = body;
    body["ok"] = json!(true);
    ResponseTemplate::new(200).set_body_json(body)
}

fn transport_error(err: EnvbotError) -> TransportError {
    match err {
        EnvbotError::Transport(boxed) => *boxed,
        other => panic!("Expected EnvbotError::Transport, got {other:?}"),
    }
}

async fn mount_channels(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/conversations.list"))
        .and(query_param_is_missing("cursor"))
        .and(header("authorization", "Bearer xoxb-test"))
        .respond_with(ok(json!({
            "channels": [{ "id": "C00", "name": "general", "is_private": false }],
            "response_metadata": { "next_cursor": "page2" }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/conversations.list"))
        .and(query_param("cursor", "page2"))
        .respond_with(ok(json!({
            "channels": [{ "id": "C01", "name": "backend-envs", "is_private": true }],
            "response_metadata": { "next_cursor": "" }
        })))
        .mount(server)
        .await;
}

async fn mount_latest(server: &MockServer, files: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/auth.test"))
        .and(header("authorization", "Bearer xoxb-test"))
        .respond_with(ok(json!({ "user_id": "UBOT" })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files.list"))
        .and(header("authorization", "Bearer xoxp-test"))
        .and(query_param("channel", "C01"))
        .and(query_param("user", "UBOT"))
        .and(query_param("count", "1"))
        .respond_with(ok(json!({ "files": files })))
        .mount(server)
        .await;
}

// =============================================================================
// resolve_channel
// =============================================================================

#[tokio::test]
async fn test_resolve_channel_follows_cursor() {
    let server = MockServer::start().await;
    mount_channels(&server).await;

    let found = store(&server)
        .resolve_channel("backend-envs")
        .await
        .expect("lookup succeeds");
    assert_eq!(found, Some(channel()));
}

#[tokio::test]
async fn test_resolve_channel_unknown() {
    let server = MockServer::start().await;
    mount_channels(&server).await;

    let found = store(&server)
        .resolve_channel("frontend-envs")
        .await
        .expect("lookup succeeds");
    assert_eq!(found, None);
}

#[tokio::test]
async fn test_resolve_channel_stuck_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations.list"))
        .respond_with(ok(json!({
            "channels": [],
            "response_metadata": { "next_cursor": "same" }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let err = store(&server)
        .resolve_channel("backend-envs")
        .await
        .expect_err("cursor never advances");
    assert_eq!(err.user_message(), "failed to sync env");
    match transport_error(err) {
        TransportError::Decode { method, message } => {
            assert_eq!(method, "conversations.list");
            assert_eq!(message, "pagination did not finish after 2 pages");
        }
        other => panic!("Expected TransportError::Decode, got {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations.list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ok": false, "error": "invalid_auth" })),
        )
        .mount(&server)
        .await;

    let err = store(&server)
        .resolve_channel("backend-envs")
        .await
        .expect_err("invalid auth");
    assert_eq!(err.user_message(), "failed to sync env");
    match transport_error(err) {
        TransportError::Api { method, code } => {
            assert_eq!(method, "conversations.list");
            assert_eq!(code, "invalid_auth");
        }
        other => panic!("Expected TransportError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations.list"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = store(&server)
        .resolve_channel("backend-envs")
        .await
        .expect_err("unavailable");
    match transport_error(err) {
        TransportError::HttpError { status, .. } => assert_eq!(status, 503),
        other => panic!("Expected TransportError::HttpError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_bot_token_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = SlackStore::builder().api_url(server.uri()).build();
    let err = store
        .resolve_channel("backend-envs")
        .await
        .expect_err("no token");
    assert!(matches!(
        transport_error(err),
        TransportError::MissingToken(TokenKind::Bot)
    ));
}

// =============================================================================
// latest_snapshot / snapshot_contents
// =============================================================================

#[tokio::test]
async fn test_latest_snapshot() {
    let server = MockServer::start().await;
    let url = format!("{}/files/F01", server.uri());
    mount_latest(
        &server,
        json!([{ "id": "F01", "title": "1700000000000", "url_private": url }]),
    )
    .await;

    let latest = store(&server)
        .latest_snapshot(&channel())
        .await
        .expect("listing succeeds");
    assert_eq!(
        latest,
        Some(SnapshotRef {
            id: "F01".to_string(),
            title: "1700000000000".to_string(),
            url: Some(url),
        })
    );
}

#[tokio::test]
async fn test_latest_snapshot_none() {
    let server = MockServer::start().await;
    mount_latest(&server, json!([])).await;

    let latest = store(&server)
        .latest_snapshot(&channel())
        .await
        .expect("listing succeeds");
    assert_eq!(latest, None);
}

#[tokio::test]
async fn test_latest_snapshot_needs_user_token() {
    let server = MockServer::start().await;
    let store = SlackStore::builder()
        .api_url(server.uri())
        .bot_token(BOT)
        .build();

    let err = store
        .latest_snapshot(&channel())
        .await
        .expect_err("no user token");
    assert!(matches!(
        transport_error(err),
        TransportError::MissingToken(TokenKind::User)
    ));
}

#[tokio::test]
async fn test_snapshot_contents_download() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/F01"))
        .and(header("authorization", "Bearer xoxb-test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("DB_NAME=foo\r\nDB_PASSWORD="))
        .mount(&server)
        .await;

    let snapshot = SnapshotRef {
        id: "F01".to_string(),
        title: String::new(),
        url: Some(format!("{}/files/F01", server.uri())),
    };
    let bytes = store(&server)
        .snapshot_contents(&snapshot)
        .await
        .expect("download succeeds");
    assert_eq!(bytes, b"DB_NAME=foo\r\nDB_PASSWORD=");
}

#[tokio::test]
async fn test_snapshot_contents_size_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/huge"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'A'; MAX_SNAPSHOT_BYTES + 1]))
        .mount(&server)
        .await;

    let snapshot = SnapshotRef {
        id: "huge".to_string(),
        title: String::new(),
        url: Some(format!("{}/files/huge", server.uri())),
    };
    let err = store(&server)
        .snapshot_contents(&snapshot)
        .await
        .expect_err("too large");
    assert!(matches!(
        transport_error(err),
        TransportError::TooLarge { limit, .. } if limit == MAX_SNAPSHOT_BYTES
    ));
}

// =============================================================================
// upload_snapshot
// =============================================================================

async fn mount_upload(server: &MockServer, expected_uploads: u64) {
    Mock::given(method("POST"))
        .and(path("/files.getUploadURLExternal"))
        .and(header("authorization", "Bearer xoxb-test"))
        .and(body_string_contains("filename="))
        .respond_with(ok(json!({
            "upload_url": format!("{}/upload/F09", server.uri()),
            "file_id": "F09"
        })))
        .expect(expected_uploads)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/upload/F09"))
        .and(body_string_contains("DB_NAME=foo\r\nDB_PASSWORD="))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK - 42"))
        .expect(expected_uploads)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/files.completeUploadExternal"))
        .and(body_string_contains("channel_id=C01"))
        .and(body_string_contains("F09"))
        .respond_with(ok(json!({ "files": [{ "id": "F09" }] })))
        .expect(expected_uploads)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_upload_three_steps() {
    let server = MockServer::start().await;
    mount_upload(&server, 1).await;

    let contents = b"DB_NAME=foo\r\nDB_PASSWORD=".to_vec();
    store(&server)
        .upload_snapshot(&channel(), contents)
        .await
        .expect("upload succeeds");

    let requests = server.received_requests().await.expect("recording enabled");
    let ticket = requests
        .iter()
        .find(|r| r.url.path() == "/files.getUploadURLExternal")
        .expect("ticket requested");
    let body = String::from_utf8_lossy(&ticket.body);
    assert!(body.contains("length=25"), "unexpected body {body}");

    let upload = requests
        .iter()
        .find(|r| r.url.path() == "/upload/F09")
        .expect("file posted");
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"file\""), "unexpected body {body}");
    assert!(body.contains("DB_NAME=foo\r\nDB_PASSWORD="), "unexpected body {body}");
}

#[tokio::test]
async fn test_upload_rejected_by_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files.getUploadURLExternal"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ok": false, "error": "not_in_channel" })),
        )
        .mount(&server)
        .await;

    let err = store(&server)
        .upload_snapshot(&channel(), b"A=1".to_vec())
        .await
        .expect_err("not in channel");
    assert_eq!(err.user_message(), "failed to sync env");
}

// =============================================================================
// Full run
// =============================================================================

fn env_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
    file.write_all(content.as_bytes()).expect("write env file");
    file
}

#[tokio::test]
async fn test_sync_skips_when_in_sync() {
    let server = MockServer::start().await;
    mount_channels(&server).await;
    let url = format!("{}/files/F01", server.uri());
    mount_latest(&server, json!([{ "id": "F01", "title": "1", "url_private": url }])).await;
    Mock::given(method("GET"))
        .and(path("/files/F01"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("DB_NAME=foo\r\nDB_PASSWORD=\r\nDB_USER=johndoe"),
        )
        .mount(&server)
        .await;
    mount_upload(&server, 0).await;

    let file = env_file("DB_NAME=foo\nDB_PASSWORD=mysecret\nDB_USER=johndoe\n");
    let request = SyncRequest::builder()
        .channel("backend-envs")
        .env_file(file.path())
        .patterns(PatternSet::new(["*", "!DB_PASSWORD"]))
        .build();

    let store = store(&server);
    let outcome = SyncOrchestrator::new(&store)
        .run(&request, |_| {})
        .await
        .expect("sync succeeds");
    assert_eq!(outcome, SyncOutcome::InSync);
}

#[tokio::test]
async fn test_sync_uploads_when_values_differ() {
    let server = MockServer::start().await;
    mount_channels(&server).await;
    let url = format!("{}/files/F01", server.uri());
    mount_latest(&server, json!([{ "id": "F01", "title": "1", "url_private": url }])).await;
    Mock::given(method("GET"))
        .and(path("/files/F01"))
        .respond_with(ResponseTemplate::new(200).set_body_string("DB_NAME=old\r\nDB_PASSWORD="))
        .mount(&server)
        .await;
    mount_upload(&server, 1).await;

    let file = env_file("DB_NAME=foo\nDB_PASSWORD=mysecret\n");
    let request = SyncRequest::builder()
        .channel("backend-envs")
        .env_file(file.path())
        .patterns(PatternSet::new(["DB_NAME"]))
        .build();

    let store = store(&server);
    let outcome = SyncOrchestrator::new(&store)
        .run(&request, |_| {})
        .await
        .expect("sync succeeds");
    assert_eq!(outcome, SyncOutcome::Uploaded { first_sync: false });
}

#[tokio::test]
async fn test_sync_unknown_channel() {
    let server = MockServer::start().await;
    mount_channels(&server).await;

    let file = env_file("A=1\n");
    let request = SyncRequest::builder()
        .channel("frontend-envs")
        .env_file(file.path())
        .build();

    let store = store(&server);
    let err = SyncOrchestrator::new(&store)
        .run(&request, |_| {})
        .await
        .expect_err("unknown channel");
    assert_eq!(
        err.user_message(),
        "frontend-envs channel not found. Perhaps you forgot to invite envbot to the private channel"
    );
}
