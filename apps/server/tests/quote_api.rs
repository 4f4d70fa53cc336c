use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use quote_storage_server::{api::app_router, build_state, config::Config};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const BOUNDARY: &str = "quote-storage-test-boundary";

enum Backend {
    Database,
    FileSystem,
}

async fn build_test_router(backend: Backend) -> (TempDir, Router) {
    let tmp = tempdir().unwrap();
    let mut vars = HashMap::new();
    match backend {
        Backend::Database => {
            vars.insert("QS_STORAGE_TYPE", "DB".to_string());
            vars.insert(
                "QS_STORAGE_DB_CONNECTION_STRING",
                tmp.path().join("quotes.db").display().to_string(),
            );
        }
        Backend::FileSystem => {
            vars.insert("QS_STORAGE_TYPE", "FileSystem".to_string());
            vars.insert(
                "QS_STORAGE_FS_BASE_DIRECTORY",
                tmp.path().display().to_string(),
            );
        }
    }

    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let state = build_state(&config).await.unwrap();
    (tmp, app_router(state, &config))
}

fn upload_request(file_name: &str, content_type: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/saveFile")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn upload_then_fetch_returns_same_bytes(backend: Backend) {
    let (_tmp, app) = build_test_router(backend).await;
    let content = b"date,open,high,low,close\n2023-07-08,1.0,2.0,0.5,1.5\n";

    let (status, body) = send(
        &app,
        upload_request("WienerBoerse_20230708.csv", "text/csv", content),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
    assert!(body.is_empty());

    let response = app
        .clone()
        .oneshot(get_request("/api/quoteSingle/WienerBoerse/2023-07-08"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.as_ref(), content);
}

async fn invalid_uploads_are_rejected(backend: Backend) {
    let (_tmp, app) = build_test_router(backend).await;

    let (status, body) = send(
        &app,
        upload_request("WienerBoerse_20230708.csv", "application/octet-stream", b"x"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"Supports only text/csv content type");

    let cases: [(&str, &[u8]); 4] = [
        ("WienerBoerse.csv", b"Invalid uploaded file name"),
        ("Nasdaq_20230708.csv", b"Unsupported exchange"),
        ("WienerBoerse_20230708.txt", b"Supports only csv files"),
        ("WienerBoerse_20231340.csv", b"Invalid filename. Invalid date"),
    ];
    for (file_name, reason) in cases {
        let (status, body) = send(&app, upload_request(file_name, "text/csv", b"x")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{file_name}");
        assert_eq!(body, reason, "{file_name}");
    }

    let (status, body) = send(
        &app,
        get_request("/api/quoteList?dateFrom=2023-01-01&dateTo=2023-12-31"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]");
}

async fn unknown_key_is_404(backend: Backend) {
    let (_tmp, app) = build_test_router(backend).await;

    let (status, _) = send(
        &app,
        get_request("/api/quoteSingle/ShanghaiFuturesExchange/2023-07-08"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get_request("/api/quoteSingle/Nasdaq/2023-07-08")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get_request("/api/quoteSingle/WienerBoerse/not-a-date")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn quote_list_filters_and_orders(backend: Backend) {
    let (_tmp, app) = build_test_router(backend).await;
    for name in [
        "WienerBoerse_20230702.csv",
        "ShanghaiFuturesExchange_20230702.csv",
        "ShanghaiFuturesExchange_20230701.csv",
        "WienerBoerse_20230801.csv",
    ] {
        let (status, _) = send(&app, upload_request(name, "text/csv", b"x")).await;
        assert_eq!(status, StatusCode::OK, "{name}");
    }

    let (status, body) = send(
        &app,
        get_request("/api/quoteList?dateFrom=2023-07-01&dateTo=2023-07-31"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        list,
        serde_json::json!([
            { "quoteProvider": "ShanghaiFuturesExchange", "date": "2023-07-01" },
            { "quoteProvider": "ShanghaiFuturesExchange", "date": "2023-07-02" },
            { "quoteProvider": "WienerBoerse", "date": "2023-07-02" }
        ])
    );

    let (status, body) = send(
        &app,
        get_request(
            "/api/quoteList?quoteProvider=wienerboerse&dateFrom=2023-07-02&dateTo=2023-08-01",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        list,
        serde_json::json!([
            { "quoteProvider": "WienerBoerse", "date": "2023-07-02" },
            { "quoteProvider": "WienerBoerse", "date": "2023-08-01" }
        ])
    );

    let (status, _) = send(
        &app,
        get_request("/api/quoteList?dateFrom=2023-07-31&dateTo=2023-07-01"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get_request("/api/quoteList?dateFrom=2023-07-01")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn reupload_overwrites(backend: Backend) {
    let (_tmp, app) = build_test_router(backend).await;
    send(&app, upload_request("ShanghaiFuturesExchange_20230708.csv", "text/csv", b"v1")).await;
    let (status, _) = send(
        &app,
        upload_request("ShanghaiFuturesExchange_20230708.csv", "text/csv; charset=utf-8", b"v2"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        get_request("/api/quoteSingle/ShanghaiFuturesExchange/20230708"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"v2");
}

#[tokio::test]
async fn database_upload_then_fetch_returns_same_bytes() {
    upload_then_fetch_returns_same_bytes(Backend::Database).await;
}

#[tokio::test]
async fn filesystem_upload_then_fetch_returns_same_bytes() {
    upload_then_fetch_returns_same_bytes(Backend::FileSystem).await;
}

#[tokio::test]
async fn database_invalid_uploads_are_rejected() {
    invalid_uploads_are_rejected(Backend::Database).await;
}

#[tokio::test]
async fn filesystem_invalid_uploads_are_rejected() {
    invalid_uploads_are_rejected(Backend::FileSystem).await;
}

#[tokio::test]
async fn database_unknown_key_is_404() {
    unknown_key_is_404(Backend::Database).await;
}

#[tokio::test]
async fn filesystem_unknown_key_is_404() {
    unknown_key_is_404(Backend::FileSystem).await;
}

#[tokio::test]
async fn database_quote_list_filters_and_orders() {
    quote_list_filters_and_orders(Backend::Database).await;
}

#[tokio::test]
async fn filesystem_quote_list_filters_and_orders() {
    quote_list_filters_and_orders(Backend::FileSystem).await;
}

#[tokio::test]
async fn database_reupload_overwrites() {
    reupload_overwrites(Backend::Database).await;
}

#[tokio::test]
async fn filesystem_reupload_overwrites() {
    reupload_overwrites(Backend::FileSystem).await;
}

#[tokio::test]
async fn healthz_and_openapi_are_served() {
    let (_tmp, app) = build_test_router(Backend::FileSystem).await;

    let (status, body) = send(&app, get_request("/api/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    let (status, body) = send(&app, get_request("/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(doc["paths"]["/api/quoteList"].is_object());
    assert!(doc["paths"]["/api/saveFile"].is_object());
}

#[tokio::test]
async fn missing_file_part_is_rejected() {
    let (_tmp, app) = build_test_router(Backend::FileSystem).await;
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\n\
         hello\r\n--{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/saveFile")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"File must be provided");
}
