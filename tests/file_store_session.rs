mod common;

use std::sync::Arc;

use bookshelf_client::{CredentialStore, FileStore, RequestOptions};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_over, mint_token};

#[tokio::test]
async fn refreshed_pair_survives_reopening_the_store() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session").join("credentials.json");

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "A2",
            "refresh_token": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/library/7"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(FileStore::new(&file));
    store
        .store_pair(&bookshelf_client::CredentialPair {
            access_token: mint_token("7", "ada", -10),
            refresh_token: "R1".into(),
        })
        .unwrap();

    let client = client_over(&server.uri(), store);
    let resp = client
        .dispatch("library/7", RequestOptions::get())
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let reopened = FileStore::new(&file).load().unwrap();
    assert_eq!(reopened.access_token.as_deref(), Some("A2"));
    assert_eq!(reopened.refresh_token.as_deref(), Some("R2"));
}
