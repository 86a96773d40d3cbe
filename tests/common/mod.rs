#![allow(dead_code)]

use std::sync::Arc;

use bookshelf_client::{BookshelfClient, Config, CredentialPair, CredentialStore, MemoryStore};
use jsonwebtoken::{EncodingKey, Header};

/// HS256 token for user `sub` expiring `exp_offset_secs` from now.
pub fn mint_token(sub: &str, username: &str, exp_offset_secs: i64) -> String {
    let exp = jiff::Timestamp::now().as_second() + exp_offset_secs;
    jsonwebtoken::encode(
        &Header::default(),
        &serde_json::json!({"sub": sub, "username": username, "exp": exp}),
        &EncodingKey::from_secret(b"server-only"),
    )
    .expect("mint token")
}

pub fn logged_in(server_uri: &str, access: &str, refresh: &str) -> (BookshelfClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_pair(&CredentialPair {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }));
    (client_over(server_uri, store.clone()), store)
}

pub fn logged_out(server_uri: &str) -> (BookshelfClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (client_over(server_uri, store.clone()), store)
}

pub fn client_over(server_uri: &str, store: Arc<dyn CredentialStore>) -> BookshelfClient {
    BookshelfClient::new(Config::from_values(server_uri, Some(10)), store).expect("client")
}
