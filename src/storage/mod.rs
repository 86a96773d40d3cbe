//! Persisted credential pair behind a small key-value port.

use serde::{Deserialize, Serialize};

use crate::errors::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// A freshly issued access/refresh pair, as returned by login and refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Whatever is currently stored; either half may be missing when logged out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredCredentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Key-value storage for credentials.
///
/// Single operations must be safe to call from several tasks. Nothing here
/// serializes a read-refresh-write cycle across calls; concurrent refreshes
/// race and the last write wins.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    fn remove(&self, key: &str) -> Result<(), Error>;

    fn load(&self) -> Result<StoredCredentials, Error> {
        Ok(StoredCredentials {
            access_token: self.get(ACCESS_TOKEN_KEY)?,
            refresh_token: self.get(REFRESH_TOKEN_KEY)?,
        })
    }

    /// Writes both tokens. Implementations that can do so should make this one write.
    fn store_pair(&self, pair: &CredentialPair) -> Result<(), Error> {
        self.set(ACCESS_TOKEN_KEY, &pair.access_token)?;
        self.set(REFRESH_TOKEN_KEY, &pair.refresh_token)
    }

    fn clear(&self) -> Result<(), Error> {
        self.remove(ACCESS_TOKEN_KEY)?;
        self.remove(REFRESH_TOKEN_KEY)
    }
}
