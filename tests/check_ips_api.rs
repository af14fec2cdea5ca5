//! End-to-end tests for `POST /check-ips` against a mocked blacklist site.

mod common;

use common::spawn_app;
use pagelens::server::AppState;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn state_for(upstream: &MockServer) -> AppState {
    AppState {
        blacklist_base_url: upstream.uri(),
    }
}

fn results_page(ips: &[&str]) -> String {
    let rows: String = ips
        .iter()
        .enumerate()
        .map(|(i, ip)| {
            format!(
                "<tr><td>{}</td><td>{ip}</td><td>mail{}.example.com</td><td></td>\
                 <td>yes</td><td>No</td><td>80</td><td>ok</td></tr>",
                i + 1,
                i + 1
            )
        })
        .collect();
    format!(
        r#"<html><body><table class="table">
            <tr><th>#</th><th>IP</th><th>PTR</th><th>SpamCop</th><th>Spamhaus</th>
                <th>Barracuda</th><th>Score</th><th>Base</th></tr>
            {rows}
        </table></body></html>"#
    )
}

async fn mount_toggle(upstream: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/toggle-colorblind-mode"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2) // hit twice to land back on the off state
        .mount(upstream)
        .await;
}

#[tokio::test]
async fn check_ips_parses_result_table() {
    let upstream = MockServer::start().await;
    mount_toggle(&upstream).await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("1.2.3.4%0A5.6.7.8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[
            "1.2.3.4", "5.6.7.8",
        ])))
        .mount(&upstream)
        .await;

    let addr = spawn_app(state_for(&upstream)).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/check-ips"))
        .json(&json!({"ips": ["1.2.3.4", "5.6.7.8"]}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "success");
    assert_eq!(body["ip_count"], 2);
    assert!(body["processing_time"].as_f64().expect("timing") >= 0.0);

    let results = body["results"].as_array().expect("results array");
    assert_eq!(results[0]["ip"], "1.2.3.4");
    assert_eq!(results[1]["ip"], "5.6.7.8");
    assert_eq!(results[0]["ptr_record"], "mail1.example.com");
    assert_eq!(results[0]["spamcop"], "No"); // empty cell normalized
    assert_eq!(results[0]["spamhaus"], "Yes"); // lowercase normalized
    assert_eq!(results[0]["api"], "N/A"); // eight-cell row
}

#[tokio::test]
async fn check_ips_full_batch_of_fifty() {
    let ips: Vec<String> = (1..=50).map(|i| format!("10.0.0.{i}")).collect();
    let ip_refs: Vec<&str> = ips.iter().map(String::as_str).collect();

    let upstream = MockServer::start().await;
    mount_toggle(&upstream).await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&ip_refs)))
        .mount(&upstream)
        .await;

    let addr = spawn_app(state_for(&upstream)).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/check-ips"))
        .json(&json!({ "ips": ips }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["ip_count"], 50);
}

#[tokio::test]
async fn check_ips_missing_table_is_hard_error() {
    let upstream = MockServer::start().await;
    mount_toggle(&upstream).await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>maintenance</body></html>"),
        )
        .mount(&upstream)
        .await;

    let addr = spawn_app(state_for(&upstream)).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/check-ips"))
        .json(&json!({"ips": ["1.2.3.4"]}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Results table not found");
    assert!(body["processing_time"].as_f64().expect("timing") >= 0.0);
}

#[tokio::test]
async fn check_ips_toggle_failure_is_non_fatal() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/toggle-colorblind-mode"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["1.2.3.4"])))
        .mount(&upstream)
        .await;

    let addr = spawn_app(state_for(&upstream)).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/check-ips"))
        .json(&json!({"ips": ["1.2.3.4"]}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "success");
    assert_eq!(body["ip_count"], 1);
}

#[tokio::test]
async fn check_ips_validation_errors() {
    let addr = spawn_app(AppState::default()).await;
    let client = reqwest::Client::new();

    // Missing key.
    let response = client
        .post(format!("http://{addr}/check-ips"))
        .json(&json!({}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["message"], "IP list required");

    // Not an array.
    let response = client
        .post(format!("http://{addr}/check-ips"))
        .json(&json!({"ips": "1.2.3.4"}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["message"], "IPs must be provided as an array");

    // Empty batch.
    let response = client
        .post(format!("http://{addr}/check-ips"))
        .json(&json!({"ips": []}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "No IP addresses provided");
    assert!(body["processing_time"].as_f64().expect("timing") >= 0.0);

    // Oversized batch.
    let too_many: Vec<String> = (0..51).map(|i| format!("10.0.0.{i}")).collect();
    let response = client
        .post(format!("http://{addr}/check-ips"))
        .json(&json!({ "ips": too_many }))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["message"], "Too many IP addresses (maximum 50)");
}

#[tokio::test]
async fn check_ips_upstream_network_failure() {
    let upstream = MockServer::start().await;
    let state = state_for(&upstream);
    drop(upstream);

    let addr = spawn_app(state).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/check-ips"))
        .json(&json!({"ips": ["1.2.3.4"]}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().expect("message").len() > 0);
}
