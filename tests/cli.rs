//! Exit status and output of the `page-brochure` binary.

use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY_VAR: &str = "PAGE_BROCHURE_CLI_TEST_KEY";

/// Points the completion API at the mock server and reads the key from `KEY_VAR`
fn write_config(dir: &Path, server: &MockServer) -> PathBuf {
    let path = dir.join("config.json");
    let config = json!({
        "api_base": format!("{}/v1", server.uri()),
        "api_key_env": KEY_VAR,
    });
    std::fs::write(&path, config.to_string()).unwrap();
    path
}

async fn mount_completion_never_called(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

async fn run(dir: &Path, key: Option<&str>, args: &[String]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_page-brochure"));
    cmd.current_dir(dir)
        .args(args)
        .env_remove("OPENAI_BASE_URL")
        .env("RUST_LOG", "error");
    match key {
        Some(key) => cmd.env(KEY_VAR, key),
        None => cmd.env_remove(KEY_VAR),
    };
    cmd.output().await.unwrap()
}

#[tokio::test]
async fn test_missing_credential_exits_before_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<body><p>Hi</p></body>"))
        .expect(0)
        .mount(&server)
        .await;
    mount_completion_never_called(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server);
    let args = vec![
        "--config".to_string(),
        config.display().to_string(),
        format!("{}/", server.uri()),
    ];
    let output = run(dir.path(), None, &args).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PAGE_BROCHURE_CLI_TEST_KEY environment variable not set"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unavailable_page_exits_with_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_completion_never_called(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server);
    let args = vec![
        "--config".to_string(),
        config.display().to_string(),
        format!("{}/missing", server.uri()),
    ];
    let output = run(dir.path(), Some("sk-test"), &args).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not process website"));
}

#[tokio::test]
async fn test_page_without_links_prints_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Acme</title></head><body><header>nav</header><p>Hello</p></body></html>",
        ))
        .mount(&server)
        .await;
    mount_completion_never_called(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server);
    let url = format!("{}/", server.uri());
    let args = vec![
        "--config".to_string(),
        config.display().to_string(),
        url.clone(),
    ];
    let output = run(dir.path(), Some("sk-test"), &args).await;

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["url"], json!(url));
    assert_eq!(report["title"], json!("Acme"));
    assert_eq!(report["relevant_links"], json!({"links": []}));
}
