//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral local port and returns its address.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Base URL with trailing slash for a served router.
pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}/")
}

/// A GitLab merge request webhook body.
pub fn merge_request_payload(action: &str, source_branch: &str, project_id: i64, iid: i64) -> Value {
    json!({
        "object_kind": "merge_request",
        "event_type": "merge_request",
        "user": {"id": 1, "name": "Administrator", "username": "root"},
        "project": {"id": project_id, "name": "relay-test"},
        "object_attributes": {
            "id": 9000 + iid,
            "iid": iid,
            "target_branch": "main",
            "source_branch": source_branch,
            "source_project_id": project_id,
            "target_project_id": project_id,
            "title": "Some change",
            "state": "opened",
            "action": action
        }
    })
}

/// Polls `condition` every 10ms for up to two seconds.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
