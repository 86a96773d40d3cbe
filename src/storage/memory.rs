use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::errors::Error;

use super::{ACCESS_TOKEN_KEY, CredentialPair, CredentialStore, REFRESH_TOKEN_KEY};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(pair: &CredentialPair) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(ACCESS_TOKEN_KEY.to_string(), pair.access_token.clone());
            entries.insert(REFRESH_TOKEN_KEY.to_string(), pair.refresh_token.clone());
        }
        store
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, Error> {
        self.entries
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".into()))
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn store_pair(&self, pair: &CredentialPair) -> Result<(), Error> {
        let mut entries = self.entries()?;
        entries.insert(ACCESS_TOKEN_KEY.to_string(), pair.access_token.clone());
        entries.insert(REFRESH_TOKEN_KEY.to_string(), pair.refresh_token.clone());
        Ok(())
    }
}
