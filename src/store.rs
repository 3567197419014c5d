use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result, StorageError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entry {
    pub name: String,
    pub secret: String,
}

impl Entry {
    pub fn new(name: &str, secret: &str) -> Self {
        Entry {
            name: String::from(name),
            secret: String::from(secret),
        }
    }
}

/// The persisted collection, in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Store {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Store {
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn add(&mut self, name: &str, secret: &str) -> Result<()> {
        if self.find(name).is_some() {
            return Err(Error::DuplicateName(String::from(name)));
        }
        self.entries.push(Entry::new(name, secret));
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Entry> {
        match self.entries.iter().position(|entry| entry.name == name) {
            Some(index) => Ok(self.entries.remove(index)),
            None => Err(Error::NotFound(String::from(name))),
        }
    }
}

pub trait EntryStoreOperations: Send + Sync {
    fn add(&self, name: &str, secret: &str) -> Result<()>;
    fn remove(&self, name: &str) -> Result<Entry>;
    fn list(&self) -> Result<Vec<Entry>>;
    fn find(&self, name: &str) -> Result<Entry>;
}

/// Named secrets kept in a single JSON file.
///
/// Every operation reloads the file. Mutations hold `write_lock` for the
/// whole load, modify and save cycle, and saves replace the file atomically,
/// so readers never need the lock.
pub struct SecretStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SecretStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty store.
    pub fn load(&self) -> Result<Store> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Store::default()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                }
                .into())
            }
        };

        serde_json::from_slice(&contents).map_err(|source| {
            StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }
            .into()
        })
    }

    pub fn save(&self, store: &Store) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.write(store)
    }

    fn update<T>(&self, mutate: impl FnOnce(&mut Store) -> Result<T>) -> Result<T> {
        let _guard = self.write_lock.lock();
        let mut store = self.load()?;
        let result = mutate(&mut store)?;
        self.write(&store)?;
        Ok(result)
    }

    fn write(&self, store: &Store) -> Result<()> {
        self.write_through(store, &self.temp_path())
    }

    /// Writes `store` to `temp_path` and renames it over the store file.
    fn write_through(&self, store: &Store, temp_path: &Path) -> Result<()> {
        let contents = serde_json::to_vec_pretty(store).map_err(StorageError::Serialize)?;

        let result = write_synced(temp_path, &contents)
            .and_then(|_| fs::rename(temp_path, &self.path));

        if let Err(source) = result {
            let _ = fs::remove_file(temp_path);
            return Err(StorageError::Write {
                path: self.path.clone(),
                source,
            }
            .into());
        }
        Ok(())
    }

    // Sibling of the store file so the rename never crosses filesystems.
    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("store"));
        let unique = format!(
            ".{}.{}.{}.tmp",
            file_name,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        self.path.with_file_name(unique)
    }
}

fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

impl EntryStoreOperations for SecretStore {
    /// The secret is stored as given; it is only decoded when a code is derived.
    fn add(&self, name: &str, secret: &str) -> Result<()> {
        self.update(|store| store.add(name, secret))
    }

    fn remove(&self, name: &str) -> Result<Entry> {
        self.update(|store| store.remove(name))
    }

    fn list(&self) -> Result<Vec<Entry>> {
        Ok(self.load()?.entries)
    }

    fn find(&self, name: &str) -> Result<Entry> {
        self.load()?
            .find(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(String::from(name)))
    }
}
