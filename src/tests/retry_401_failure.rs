use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::dispatcher::RequestOptions;
use crate::storage::CredentialStore;
use crate::tests::test_support::{capture_logs, client_with, drain_events, drain_logs, mint_token};
use crate::{Error, SessionEvent};

#[tokio::test]
async fn refresh_rejection_after_401_invalidates_session() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/delete/b1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid token scope"))
        .expect(1)
        .mount(&server)
        .await;

    let access = mint_token("7", "ada", 600);
    let (client, store) = client_with(&server.uri(), &access, "R1");
    let mut events = client.subscribe();

    let (lines, guard) = capture_logs();
    let res = client.dispatch("delete/b1", RequestOptions::delete()).await;
    drop(guard);

    match res {
        Err(Error::Auth(msg)) => assert_eq!(msg, "unauthorized"),
        Err(other) => panic!("expected Error::Auth, got {}", other),
        Ok(resp) => panic!("expected Error::Auth, got status {}", resp.status()),
    }

    let stored = store.load().unwrap();
    assert_eq!(stored.access_token.as_deref(), Some(access.as_str()));
    assert_eq!(stored.refresh_token.as_deref(), Some("R1"));

    assert_eq!(
        drain_events(&mut events),
        vec![SessionEvent::Invalidated {
            reason: "unauthorized".into()
        }]
    );

    let logs = drain_logs(lines);
    assert!(
        logs.iter()
            .any(|line| line.contains("ERROR") && line.contains("refresh.failure")),
        "expected refresh failure telemetry, got {:?}",
        logs
    );
}

#[tokio::test]
async fn unauthorized_without_refresh_token_returns_the_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/library/7"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Not authenticated"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (client, store) = client_with(&server.uri(), &mint_token("7", "ada", 600), "R1");
    store.remove(crate::storage::REFRESH_TOKEN_KEY).unwrap();
    let mut events = client.subscribe();

    let resp = client
        .dispatch("library/7", RequestOptions::get())
        .await
        .expect("nothing to refresh with, so the 401 is returned as-is");
    assert_eq!(resp.status(), 401);
    assert_eq!(resp.text().await.unwrap(), "Not authenticated");
    assert!(drain_events(&mut events).is_empty());
}
