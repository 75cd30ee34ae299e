//! String key-value stores standing in for browser `localStorage` and
//! `sessionStorage`.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use reel_utils::{PersistMode, atomic_write, recover_bak_file};

use crate::auth::AuthService;
use crate::error::StoreError;
use crate::{STORAGE_FILE, keys};

#[derive(Debug)]
enum Backing {
    File(PathBuf),
    Memory,
}

#[derive(Debug)]
pub struct KeyValueStore {
    entries: BTreeMap<String, String>,
    backing: Backing,
}

impl KeyValueStore {
    /// Open a file-backed store. A missing file is an empty store; so is a
    /// corrupt one, which gets replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        recover_bak_file(&path);

        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Discarding corrupt store file: {e}");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        Ok(Self {
            entries,
            backing: Backing::File(path),
        })
    }

    /// Store that lives as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            entries: BTreeMap::new(),
            backing: Backing::Memory,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File(path) => Some(path),
            Backing::Memory => None,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), StoreError> {
        self.entries.insert(key.into(), value.into());
        self.persist()
    }

    /// Serialize `value` as JSON and store it under `key`.
    pub fn set_json<T: serde::Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(key, json)
    }

    /// Remove `key`. Returns whether it was present.
    pub fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        if self.entries.remove(key).is_none() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Remove several keys with a single write.
    pub fn remove_all(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        let before = self.entries.len();
        for key in keys {
            self.entries.remove(*key);
        }
        if self.entries.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// Keep only entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) -> Result<usize, StoreError> {
        let before = self.entries.len();
        self.entries.retain(|k, v| keep(k, v));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Backing::File(path) = &self.backing else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(&self.entries).map_err(|source| StoreError::Encode {
            key: path.display().to_string(),
            source,
        })?;
        atomic_write(path, &json, PersistMode::SensitiveOwnerOnly).map_err(|source| {
            StoreError::Write {
                path: path.clone(),
                source,
            }
        })
    }
}

/// Local (persisted) and session (process-lifetime) scopes.
#[derive(Debug)]
pub struct Storage {
    pub local: KeyValueStore,
    pub session: KeyValueStore,
}

impl Storage {
    /// `<data_dir>/storage.json` plus a fresh session scope.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            local: KeyValueStore::open(data_dir.join(STORAGE_FILE))?,
            session: KeyValueStore::in_memory(),
        })
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            local: KeyValueStore::in_memory(),
            session: KeyValueStore::in_memory(),
        }
    }

    pub fn auth(&mut self) -> AuthService<'_> {
        AuthService::new(self)
    }

    /// Whether local storage carries the signed-in flag.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.local.get(keys::IS_AUTHENTICATED) == Some("true")
    }

    /// The stored TMDB key: local scope first, then session.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.local
            .get(keys::API_KEY)
            .or_else(|| self.session.get(keys::API_KEY))
            .filter(|key| !key.trim().is_empty())
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        self.local.get(keys::CURRENT_USER)
    }
}
