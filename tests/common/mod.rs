#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// `/generate` that records request bodies and answers with `response`.
pub fn recording_service(response: Value) -> (Router, Arc<Mutex<Vec<Value>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_handler = seen.clone();
    let router = Router::new().route(
        "/generate",
        post(move |Json(body): Json<Value>| {
            let seen = seen_handler.clone();
            let response = response.clone();
            async move {
                seen.lock().unwrap().push(body);
                Json(response)
            }
        }),
    );
    (router, seen)
}

/// `/generate` that echoes the prompt back as the text field.
pub fn echo_service() -> Router {
    Router::new().route(
        "/generate",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "text": body["prompt"],
                "image": "",
                "video": "",
                "meme": "",
                "sources": []
            }))
        }),
    )
}

pub fn failing_service() -> Router {
    Router::new().route(
        "/generate",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "generation exploded") }),
    )
}
