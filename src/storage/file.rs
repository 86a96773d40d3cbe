use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;
use uuid::Uuid;

use crate::errors::Error;

use super::{ACCESS_TOKEN_KEY, CredentialPair, CredentialStore, REFRESH_TOKEN_KEY};

/// Credentials kept as a flat JSON object on disk. The whole file is
/// rewritten on every mutation; a missing file reads as empty.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// concurrent reader sees either the old or the new contents. All I/O is
/// blocking `std::fs` on the calling thread; the file holds two short
/// strings.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, contents)?;
        if let Err(err) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(Error::Io(err));
        }
        debug!(path = %self.path.display(), keys = entries.len(), "credential file written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("credentials");
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
    }

    fn update<F>(&self, mutate: F) -> Result<(), Error>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::Storage("file store lock poisoned".into()))?;
        let mut entries = self.read_entries()?;
        mutate(&mut entries);
        self.write_entries(&entries)
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn store_pair(&self, pair: &CredentialPair) -> Result<(), Error> {
        self.update(|entries| {
            entries.insert(ACCESS_TOKEN_KEY.to_string(), pair.access_token.clone());
            entries.insert(REFRESH_TOKEN_KEY.to_string(), pair.refresh_token.clone());
        })
    }

    fn clear(&self) -> Result<(), Error> {
        self.update(|entries| {
            entries.remove(ACCESS_TOKEN_KEY);
            entries.remove(REFRESH_TOKEN_KEY);
        })
    }
}
