use serde::Serialize;
use tracing::{info, warn};

use crate::errors::Error;
use crate::session::SessionEvent;
use crate::storage::{ACCESS_TOKEN_KEY, CredentialPair, REFRESH_TOKEN_KEY};
use crate::telemetry::refresh::RefreshTrigger;
use crate::token;
use crate::types::CurrentUser;

use super::{BookshelfClient, read_json};

#[derive(Serialize)]
struct LogoutRequest<'a> {
    refresh_token: &'a str,
}

impl BookshelfClient {
    /// Exchanges username/password for a credential pair and stores it.
    ///
    /// Goes straight to the login endpoint, not through `dispatch`.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), Error> {
        let url = self.dispatcher.resolve(&self.config.login_path);
        let resp = self
            .dispatcher
            .http_client()
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let pair: CredentialPair = read_json("login", resp).await?;
        self.dispatcher.store().store_pair(&pair)?;
        info!(username, "login ok");
        self.dispatcher.session().emit(SessionEvent::Established);
        Ok(())
    }

    /// Revokes the refresh token server-side when possible, then clears the
    /// stored pair no matter how the server call went.
    pub async fn logout(&self) -> Result<(), Error> {
        let store = self.dispatcher.store();
        if let Some(refresh_token) = store.get(REFRESH_TOKEN_KEY)? {
            let url = self.dispatcher.resolve(&self.config.logout_path);
            let sent = self
                .dispatcher
                .http_client()
                .post(&url)
                .json(&LogoutRequest {
                    refresh_token: &refresh_token,
                })
                .send()
                .await;
            match sent {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => warn!("logout request rejected: status={}", resp.status()),
                Err(err) => warn!("logout request failed: {}", err),
            }
        }

        store.clear()?;
        info!("logged out");
        self.dispatcher.session().emit(SessionEvent::LoggedOut);
        Ok(())
    }

    pub fn current_user(&self) -> Result<CurrentUser, Error> {
        let access_token = self.dispatcher.store().get(ACCESS_TOKEN_KEY)?;
        Ok(CurrentUser {
            id: token::subject_of(access_token.as_deref()),
            username: token::username_of(access_token.as_deref()),
        })
    }

    /// True when the stored access token is valid, or a refresh exchange
    /// with the stored refresh token succeeds.
    pub async fn is_authenticated(&self) -> Result<bool, Error> {
        let stored = self.dispatcher.store().load()?;
        if token::is_valid(stored.access_token.as_deref()) {
            return Ok(true);
        }
        let Some(refresh_token) = stored.refresh_token else {
            return Ok(false);
        };
        match self
            .dispatcher
            .refresh(&refresh_token, RefreshTrigger::SessionCheck)
            .await
        {
            Ok(_) => Ok(true),
            Err(err @ (Error::Storage(_) | Error::Io(_))) => Err(err),
            Err(_) => Ok(false),
        }
    }
}
