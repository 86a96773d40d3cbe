use jiff::Timestamp;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::Error;
use crate::storage::{CredentialPair, CredentialStore};
use crate::telemetry::refresh::RefreshTelemetry;

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Trades `refresh_token` for a new pair and stores both halves.
///
/// On any failure the stored credentials are left exactly as they were.
pub(crate) async fn exchange(
    client: &Client,
    url: &str,
    refresh_token: &str,
    store: &dyn CredentialStore,
    telemetry: &RefreshTelemetry,
) -> Result<CredentialPair, Error> {
    telemetry.emit_start(Timestamp::now());
    let result = async {
        let pair = request_pair(client, url, refresh_token).await?;
        store.store_pair(&pair)?;
        Ok::<_, Error>(pair)
    }
    .await;
    match &result {
        Ok(pair) => {
            info!(
                attempt_id = %telemetry.attempt_id(),
                access_len = pair.access_token.len(),
                "credential pair refreshed"
            );
            telemetry.emit_success(Timestamp::now());
        }
        Err(err) => telemetry.emit_failure(err, Timestamp::now()),
    }
    result
}

async fn request_pair(
    client: &Client,
    url: &str,
    refresh_token: &str,
) -> Result<CredentialPair, Error> {
    let resp = client
        .post(url)
        .json(&RefreshRequest { refresh_token })
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        warn!("refresh rejected: status={} body='{}'", status, body);
        return Err(Error::Http(status, body));
    }
    let body = resp.text().await?;
    let pair: CredentialPair = serde_json::from_str(&body)?;
    Ok(pair)
}
