use serde_json::json;
use std::time::Duration;
use strikelog::source::{BugSource, HttpSource};
use strikelog::submission::NewBug;
use strikelog::types::{Severity, Status, NO_FILE_PLACEHOLDER};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// The client is blocking, so it runs off the async test runtime.
async fn with_source<T, F>(server: &MockServer, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(HttpSource) -> T + Send + 'static,
{
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let source = HttpSource::new(&uri, Duration::from_secs(5)).expect("build client");
        f(source)
    })
    .await
    .expect("blocking task")
}

fn document(id: &str, status: &str, created_at: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": format!("Bug {}", id),
        "description": "details",
        "reporter": "dana",
        "severity": "High",
        "status": status,
        "affectedFile": "src/App.js",
        "createdAt": created_at,
        "__v": 0
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_reads_mongo_documents_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bugs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            document("older", "Open", "2024-05-01T08:00:00.000Z"),
            document("newer", "In Progress", "2024-05-09T08:00:00.000Z"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let bugs = with_source(&server, |source| source.list_bugs()).await.expect("list");
    let ids: Vec<_> = bugs.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["newer", "older"]);
    assert_eq!(bugs[0].status, Status::InProgress);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_fails_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bugs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = with_source(&server, |source| source.list_bugs()).await.unwrap_err();
    assert!(err.to_string().contains("HTTP 500"), "{}", err);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn update_patches_backend_status_spelling() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/bugs/abc"))
        .and(body_json(json!({ "status": "In Progress" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(document("abc", "In Progress", "2024-05-01T08:00:00Z")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let updated = with_source(&server, |source| source.update_status("abc", Status::InProgress))
        .await
        .expect("update");
    assert_eq!(updated.id, "abc");
    assert_eq!(updated.status, Status::InProgress);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn update_of_unknown_id_reports_missing_bug() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/bugs/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Null))
        .mount(&server)
        .await;

    let err = with_source(&server, |source| source.update_status("ghost", Status::Closed))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("No bug with id ghost"), "{}", err);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn submit_posts_an_open_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bugs"))
        .and(body_partial_json(json!({
            "title": "Upload stalls",
            "reporter": "dana",
            "severity": "Critical",
            "status": "Open",
            "affectedFile": NO_FILE_PLACEHOLDER
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "fresh",
            "title": "Upload stalls",
            "description": "Large files never finish",
            "reporter": "dana",
            "severity": "Critical",
            "status": "Open",
            "affectedFile": NO_FILE_PLACEHOLDER,
            "createdAt": "2024-05-10T08:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let saved = with_source(&server, |source| {
        source.submit(NewBug {
            title: "Upload stalls".to_string(),
            description: "Large files never finish".to_string(),
            reporter: "dana".to_string(),
            severity: Severity::Critical,
            affected_file: Some("  ".to_string()),
        })
    })
    .await
    .expect("submit");
    assert_eq!(saved.id, "fresh");
    assert_eq!(saved.severity, Severity::Critical);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invalid_submission_never_reaches_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = with_source(&server, |source| {
        source.submit(NewBug {
            title: String::new(),
            description: "no title".to_string(),
            reporter: "dana".to_string(),
            ..NewBug::default()
        })
    })
    .await
    .unwrap_err();
    assert!(err.to_string().contains("title"), "{}", err);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn remove_deletes_and_surfaces_failures() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/bugs/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Deleted" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/bugs/locked"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    with_source(&server, |source| source.remove("abc")).await.expect("remove");
    let err = with_source(&server, |source| source.remove("locked")).await.unwrap_err();
    assert!(err.to_string().contains("HTTP 403"), "{}", err);
}
