use std::sync::{Arc, Mutex};

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::SessionEvent;
use crate::dispatcher::RequestOptions;
use crate::storage::CredentialStore;
use crate::tests::test_support::{capture_logs, client_with, drain_events, drain_logs, mint_token};

#[tokio::test]
async fn retries_once_after_401_with_refreshed_token() {
    let server = MockServer::start().await;
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();

    Mock::given(method("GET"))
        .and(path("/library/7"))
        .respond_with(move |req: &Request| {
            let auth = req
                .headers
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
                .expect("Authorization header missing");
            let mut guard = seen_clone.lock().unwrap();
            guard.push(auth);
            if guard.len() == 1 {
                ResponseTemplate::new(401)
            } else {
                // the retried response is returned as-is, even when it is not 2xx
                ResponseTemplate::new(503).set_body_string("maintenance")
            }
        })
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(serde_json::json!({"refresh_token": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "A2",
            "refresh_token": "R2",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let access = mint_token("7", "ada", 600);
    let (client, store) = client_with(&server.uri(), &access, "R1");
    let mut events = client.subscribe();

    let (lines, guard) = capture_logs();
    let resp = client
        .dispatch("library/7", RequestOptions::get())
        .await
        .expect("dispatch should return the retried response");
    drop(guard);

    assert_eq!(resp.status(), 503);
    assert_eq!(resp.text().await.unwrap(), "maintenance");

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, vec![format!("Bearer {access}"), "Bearer A2".to_string()]);

    let stored = store.load().unwrap();
    assert_eq!(stored.access_token.as_deref(), Some("A2"));
    assert_eq!(stored.refresh_token.as_deref(), Some("R2"));

    assert_eq!(drain_events(&mut events), vec![SessionEvent::Refreshed]);

    let logs = drain_logs(lines);
    assert!(
        logs.iter()
            .any(|line| line.contains("WARN") && line.contains("401")),
        "expected warning log mentioning 401, got: {:?}",
        logs
    );
    assert!(
        logs.iter().any(|line| line.contains("refresh.success")),
        "expected refresh telemetry, got: {:?}",
        logs
    );
}
