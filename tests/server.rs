mod common;

use std::sync::Arc;

use serde_json::Value;

use common::{FakePortal, Reply};
use portal_dash::config::Config;
use portal_dash::server::run_server_with_api;

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

/// Start the dashboard over `api` and return its base URL.
async fn start(api: FakePortal) -> String {
    let port = find_free_port();
    let mut config = Config::minimal();
    config.server.bind = format!("127.0.0.1:{}", port);
    config.api.base_url = "http://portal".into();

    tokio::spawn(async move {
        run_server_with_api(&config, Arc::new(api)).await.ok();
    });
    wait_for_server(port).await;
    format!("http://127.0.0.1:{}", port)
}

async fn get_text(url: &str) -> (u16, String) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.text().await.unwrap())
}

#[tokio::test]
async fn test_health() {
    let base = start(FakePortal::sample()).await;
    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_dashboard_without_selection() {
    let base = start(FakePortal::sample()).await;
    let (status, page) = get_text(&format!("{}/", base)).await;

    assert_eq!(status, 200);
    assert_eq!(page.matches("semester-btn").count(), 2);
    assert!(page.contains("Select a subject to load documents"));
    assert!(page.contains(r#"<select id="docFilter" name="type" disabled>"#));
}

#[tokio::test]
async fn test_dashboard_with_selection_and_filter() {
    let base = start(FakePortal::sample()).await;
    let (status, page) = get_text(&format!("{}/?sem=2&course=101&type=quiz", base)).await;

    assert_eq!(status, 200);
    assert!(page.contains(r#"data-sub="101""#));
    assert_eq!(page.matches("doc-card").count(), 1);
    assert!(page.contains("Weekly quiz"));
    assert!(page.contains("Manual Task"));
    assert!(page.contains(r#"<option value="quiz" selected>Quiz</option>"#));
}

#[tokio::test]
async fn test_dashboard_query_without_match() {
    let base = start(FakePortal::sample()).await;
    let (_, page) = get_text(&format!("{}/?sem=2&course=101&q=zzz", base)).await;
    assert!(page.contains("No matching documents found"));
    assert!(page.contains(r#"value="zzz""#));
}

#[tokio::test]
async fn test_attendance_pages() {
    let base = start(FakePortal::sample()).await;

    let (status, page) = get_text(&format!("{}/attendance", base)).await;
    assert_eq!(status, 200);
    assert!(page.contains(r#"<span id="overallValue">85.5%</span>"#));
    assert!(page.contains(r#"href="/attendance/7""#));

    let (status, fragment) = get_text(&format!("{}/attendance/7", base)).await;
    assert_eq!(status, 200);
    assert_eq!(fragment.matches("text-yellow-500").count(), 1);

    let (_, empty) = get_text(&format!("{}/attendance/8", base)).await;
    assert!(empty.contains("No records found"));
}

#[tokio::test]
async fn test_api_documents() {
    let base = start(FakePortal::sample()).await;
    let body: Value = reqwest::get(format!("{}/api/courses/101/documents?q=lab", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["types"][0]["value"], "all");
    assert_eq!(body["types"].as_array().unwrap().len(), 4);
    let docs = body["documents"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["title"], "Lab Sheet 1");
    assert_eq!(
        docs[0]["actions"]["links"]["view"],
        "http://portal/api/doc/5001?action=view"
    );
}

#[tokio::test]
async fn test_api_errors() {
    let mut api = FakePortal::sample();
    api.subjects.insert(2, Reply::Shape);
    api.subjects.insert(1, Reply::Down);
    let base = start(api).await;

    let resp = reqwest::get(format!("{}/api/semesters/2/subjects", base))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "unexpected_response");

    let resp = reqwest::get(format!("{}/api/semesters/1/subjects", base))
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "upstream");
    assert_eq!(
        body["error"]["message"],
        "Error loading subjects. Please try again."
    );
}

#[tokio::test]
async fn test_api_documents_unknown_type_is_ignored() {
    let base = start(FakePortal::sample()).await;
    let body: Value = reqwest::get(format!("{}/api/courses/101/documents?type=forum", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["documents"].as_array().unwrap().len(), 3);

    let body: Value = reqwest::get(format!("{}/api/courses/101/documents?type=QUIZ", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let docs = body["documents"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["kind"], "quiz");
}

#[tokio::test]
async fn test_api_documents_shape_error_message() {
    let mut api = FakePortal::sample();
    api.documents.insert(101, Reply::Shape);
    let base = start(api).await;

    let resp = reqwest::get(format!("{}/api/courses/101/documents", base))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "unexpected_response");
    assert_eq!(body["error"]["message"], "Unexpected server response.");
}
