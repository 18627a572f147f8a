//! A tiny persistent key/value store standing in for browser local storage.
//!
//! The whole map lives in one JSON file. Reads are served from memory; every
//! write rewrites the file through a temp file and a rename.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ActorError, StoreError};
use crate::service::UserService;
use crate::transport::Transport;

/// Key under which the default actor's user id is stored.
pub const DEFAULT_USER_ID: &str = "DEFAULT_USER_ID";

#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "opened local store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    /// Sibling of the store file with `.tmp` appended to the full name, so
    /// `a.json` and `a.yaml` never share a temp file.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// A store at `path` with no entries, ignoring whatever is on disk. The
    /// file is only touched by the next write.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        let mut file = fs::File::create(&temp)?;
        file.write_all(serde_json::to_string_pretty(&self.entries)?.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// The cached default actor, if one was ever resolved.
pub fn default_actor(store: &LocalStore) -> Option<&str> {
    store.get(DEFAULT_USER_ID)
}

/// Look `username` up once and cache its id as the default actor.
pub async fn resolve_default_actor<T: Transport>(
    users: &UserService<T>,
    store: &mut LocalStore,
    username: &str,
) -> Result<String, ActorError> {
    let user = users.find_by_username(username).await?;
    store.set(DEFAULT_USER_ID, &user.id)?;
    info!(username, user_id = %user.id, "default actor resolved");
    Ok(user.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("storage.json")).unwrap();
        assert!(default_actor(&store).is_none());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = LocalStore::open(&path).unwrap();
        store.set(DEFAULT_USER_ID, "u1").unwrap();
        drop(store);

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(default_actor(&store), Some("u1"));
        assert!(!dir.path().join("nested").join("storage.json.tmp").exists());
    }

    #[test]
    fn temp_file_keeps_full_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let sibling = dir.path().join("storage.tmp");
        fs::write(&sibling, "belongs to someone else").unwrap();

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.temp_path(), dir.path().join("storage.json.tmp"));

        let mut store = store;
        store.set(DEFAULT_USER_ID, "u1").unwrap();
        assert_eq!(fs::read_to_string(&sibling).unwrap(), "belongs to someone else");
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn empty_store_overwrites_corrupt_file_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let mut store = LocalStore::empty(&path);
        store.set(DEFAULT_USER_ID, "u1").unwrap();
        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(default_actor(&reopened), Some("u1"));
    }

    #[test]
    fn remove_deletes_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut store = LocalStore::open(&path).unwrap();
        store.set("theme", "dark").unwrap();

        assert_eq!(store.remove("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.remove("theme").unwrap(), None);
        assert!(LocalStore::open(&path).unwrap().get("theme").is_none());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(LocalStore::open(&path), Err(StoreError::Json(_))));
    }
}
