// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Tests for the HTTP health endpoint
//!
//! The listener is bound to an ephemeral port and probed with a real HTTP
//! client, the way a container runtime would.


use std::net::SocketAddr;

use serde_json::{Value, json};

use fixtures::{mount_status, mount_vm_list, two_vms};
use fusion_client::{ClientConfig, FusionClient};
use fusion_mcp::health::{self, HealthError};
use wiremock::MockServer;

async fn spawn_for(api_uri: String) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let client = FusionClient::new(ClientConfig::with_base_url(api_uri)).expect("client");
    let addr: SocketAddr = "127.0.0.1:0".parse().expect("addr");
    health::spawn(addr, client).await.expect("spawn health")
}

async fn get_json(url: String) -> (u16, Value) {
    let response = reqwest::get(url).await.expect("request");
    let status = response.status().as_u16();
    let body = response.json().await.expect("json body");
    (status, body)
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let api = MockServer::start().await;
    let (addr, handle) = spawn_for(api.uri()).await;

    let (status, body) = get_json(format!("http://{addr}/health")).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["service"], json!("vmware-fusion-mcp"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
    assert!(body["started_at"].as_str().is_some_and(|s| s.ends_with('Z')));

    handle.abort();
}

#[tokio::test]
async fn test_health_does_not_touch_fusion_api() {
    // Point at a closed port: /health must still succeed
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        format!("http://{}", listener.local_addr().expect("addr"))
    };
    let (addr, handle) = spawn_for(uri).await;

    let (status, _) = get_json(format!("http://{addr}/health")).await;
    assert_eq!(status, 200);

    handle.abort();
}

#[tokio::test]
async fn test_ready_when_api_answers() {
    let api = MockServer::start().await;
    mount_vm_list(&api, two_vms()).await;
    let (addr, handle) = spawn_for(api.uri()).await;

    let (status, body) = get_json(format!("http://{addr}/ready")).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ready", "vm_count": 2}));

    handle.abort();
}

#[tokio::test]
async fn test_ready_unavailable_on_api_error() {
    let api = MockServer::start().await;
    mount_status(&api, "GET", "/fusionsvc/vms", 503, "vmrest starting").await;
    let (addr, handle) = spawn_for(api.uri()).await;

    let (status, body) = get_json(format!("http://{addr}/ready")).await;

    assert_eq!(status, 503);
    assert_eq!(body["status"], json!("unavailable"));
    assert_eq!(
        body["error"],
        json!("VMware Fusion API error: 503 - vmrest starting")
    );

    handle.abort();
}

#[tokio::test]
async fn test_ready_unavailable_when_api_unreachable() {
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        format!("http://{}", listener.local_addr().expect("addr"))
    };
    let (addr, handle) = spawn_for(uri).await;

    let (status, body) = get_json(format!("http://{addr}/ready")).await;

    assert_eq!(status, 503);
    assert_eq!(body["status"], json!("unavailable"));
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("Failed to connect to VMware Fusion API"))
    );

    handle.abort();
}

#[tokio::test]
async fn test_ready_error_on_rejected_credentials() {
    let api = MockServer::start().await;
    mount_status(&api, "GET", "/fusionsvc/vms", 401, "Unauthorized").await;
    let (addr, handle) = spawn_for(api.uri()).await;

    let (status, body) = get_json(format!("http://{addr}/ready")).await;

    assert_eq!(status, 500);
    assert_eq!(body["status"], json!("error"));
    assert_eq!(
        body["error"],
        json!("VMware Fusion API error: 401 - Unauthorized")
    );

    handle.abort();
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let api = MockServer::start().await;
    let (addr, handle) = spawn_for(api.uri()).await;

    let response = reqwest::get(format!("http://{addr}/metrics"))
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 404);

    handle.abort();
}

#[tokio::test]
async fn test_bind_conflict() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = taken.local_addr().expect("addr");
    let client = FusionClient::new(ClientConfig::default()).expect("client");

    let err = health::spawn(addr, client).await.unwrap_err();

    assert!(matches!(err, HealthError::Bind { .. }));
    assert!(err.to_string().contains(&addr.to_string()));
}
