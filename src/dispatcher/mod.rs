use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::Error;
use crate::refresh;
use crate::session::{SessionEvent, SessionSignal};
use crate::storage::{ACCESS_TOKEN_KEY, CredentialPair, CredentialStore};
use crate::telemetry::refresh::{RefreshTelemetry, RefreshTrigger};
use crate::token;

mod options;

pub use options::{FilePart, RequestBody, RequestOptions};

/// Issues authenticated requests against the bookshelf API.
///
/// Each `dispatch` performs at most one refresh exchange and at most one
/// retried request. Tokens are read from the store on every call and never
/// cached here.
#[derive(Clone)]
pub struct Dispatcher {
    http_client: Client,
    base_url: String,
    refresh_url: String,
    store: Arc<dyn CredentialStore>,
    session: SessionSignal,
}

impl Dispatcher {
    pub fn new(config: &Config, store: Arc<dyn CredentialStore>) -> Result<Self, Error> {
        let base_url = config.normalized_base_url()?;
        let refresh_url = join(&base_url, &config.refresh_path);
        Ok(Self {
            http_client: config.http_client()?,
            base_url,
            refresh_url,
            store,
            session: SessionSignal::default(),
        })
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.store)
    }

    pub fn session(&self) -> &SessionSignal {
        &self.session
    }

    /// Absolute endpoints are used as given; relative ones hang off the base URL.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            join(&self.base_url, endpoint)
        }
    }

    /// Sends `options` to `endpoint` with the stored bearer token.
    ///
    /// Returns the final response whatever its status, except that a 401
    /// whose refresh fails, or that follows a preflight refresh, becomes
    /// `Error::Auth`. Without a stored refresh token a 401 is returned as-is.
    /// Every `Error::Auth` is also broadcast as `SessionEvent::Invalidated`.
    pub async fn dispatch(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Response, Error> {
        let result = self.dispatch_once(endpoint, &options).await;
        if let Err(Error::Auth(reason)) = &result {
            self.session.emit(SessionEvent::Invalidated {
                reason: reason.clone(),
            });
        }
        result
    }

    async fn dispatch_once(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<Response, Error> {
        let stored = self.store.load()?;
        let Some(mut access_token) = stored.access_token else {
            warn!(endpoint, "dispatch without access token");
            return Err(Error::Auth("no access token".into()));
        };
        let refresh_token = stored.refresh_token;

        let mut refreshed = false;
        if !token::is_valid(Some(&access_token))
            && let Some(refresh_token) = refresh_token.as_deref()
        {
            info!(endpoint, "access token expired; refreshing before request");
            self.refresh(refresh_token, RefreshTrigger::Preflight)
                .await
                .map_err(|err| auth_unless_storage(err, "refresh failed"))?;
            access_token = self.stored_access_token()?;
            refreshed = true;
        }

        let url = self.resolve(endpoint);
        let response = self.send(&url, options, &access_token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        warn!(endpoint, status = 401, refreshed, "request unauthorized");
        if refreshed {
            return Err(Error::Auth("unauthorized".into()));
        }
        let Some(refresh_token) = refresh_token.as_deref() else {
            return Ok(response);
        };
        self.refresh(refresh_token, RefreshTrigger::Unauthorized)
            .await
            .map_err(|err| auth_unless_storage(err, "unauthorized"))?;
        let access_token = self.stored_access_token()?;

        let retried = self.send(&url, options, &access_token).await?;
        info!(endpoint, status = %retried.status(), "request retried after refresh");
        Ok(retried)
    }

    /// One refresh exchange using `refresh_token`; emits `SessionEvent::Refreshed` on success.
    pub(crate) async fn refresh(
        &self,
        refresh_token: &str,
        trigger: RefreshTrigger,
    ) -> Result<CredentialPair, Error> {
        let telemetry = RefreshTelemetry::new(trigger);
        let pair = refresh::exchange(
            &self.http_client,
            &self.refresh_url,
            refresh_token,
            self.store.as_ref(),
            &telemetry,
        )
        .await?;
        self.session.emit(SessionEvent::Refreshed);
        Ok(pair)
    }

    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
        access_token: &str,
    ) -> Result<Response, Error> {
        let headers = options.headers_with_bearer(access_token)?;
        let builder = self
            .http_client
            .request(options.method.clone(), url)
            .headers(headers);
        let response = options.body.apply(builder)?.send().await?;
        debug!(method = %options.method, url, status = %response.status(), "request sent");
        Ok(response)
    }

    fn stored_access_token(&self) -> Result<String, Error> {
        self.store
            .get(ACCESS_TOKEN_KEY)?
            .ok_or_else(|| Error::Auth("no access token".into()))
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn auth_unless_storage(err: Error, reason: &str) -> Error {
    match err {
        Error::Storage(_) | Error::Io(_) => err,
        _ => Error::Auth(reason.into()),
    }
}
