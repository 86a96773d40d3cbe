use std::sync::Arc;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::error;

use crate::config::Config;
use crate::dispatcher::{Dispatcher, RequestOptions};
use crate::errors::Error;
use crate::session::SessionEvent;
use crate::storage::CredentialStore;
use crate::types::error_detail;

mod auth;
mod library;

/// Bookshelf API client: login/logout plus the library operations, all
/// authenticated through one [`Dispatcher`].
#[derive(Clone)]
pub struct BookshelfClient {
    dispatcher: Dispatcher,
    config: Config,
}

impl BookshelfClient {
    /// Create a new BookshelfClient
    /// # Arguments
    /// * `config` - Explicit configuration, typically loaded via `Config::from_file` or `Config::from_env`.
    /// * `store` - Where the credential pair is persisted between calls (and runs).
    pub fn new(config: Config, store: Arc<dyn CredentialStore>) -> Result<Self, Error> {
        let dispatcher = Dispatcher::new(&config, store)?;
        Ok(Self { dispatcher, config })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.dispatcher.session().subscribe()
    }

    pub async fn dispatch(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Response, Error> {
        self.dispatcher.dispatch(endpoint, options).await
    }
}

/// Decodes a 2xx body as `T`; any other status becomes `Error::Http`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    operation: &str,
    resp: Response,
) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        let detail = error_detail(&body);
        error!("{} failed: status={} detail='{}'", operation, status, detail);
        return Err(Error::Http(status, detail));
    }
    Ok(serde_json::from_str(&body)?)
}
