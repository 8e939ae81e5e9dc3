use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{Map, Value};

use crate::api::error;

pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, error::SystemError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("mediacloud/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Durable key/value storage backed by a single JSON object on disk.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the original, so several keys change together or not at all.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, error::SystemError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        Ok(serde_json::from_slice(&raw)?)
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<(), error::SystemError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.flush()?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    pub fn get<T>(&self, key: &str) -> Result<Option<T>, error::SystemError>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.read_all()?.remove(key) {
            Some(Value::Null) | None => Ok(None),
            Some(v) => Ok(Some(serde_json::from_value(v)?)),
        }
    }

    /// Stores every entry in one write.
    pub fn set_many(&self, entries: &[(&str, Value)]) -> Result<(), error::SystemError> {
        let mut all = self.read_all().unwrap_or_else(|e| {
            log::warn!("discarding unreadable storage file {}: {e}", self.path.display());
            Map::new()
        });
        for (key, value) in entries {
            all.insert((*key).to_string(), value.clone());
        }
        self.write_all(&all)
    }

    pub fn set<T>(&self, key: &str, value: &T) -> Result<(), error::SystemError>
    where
        T: serde::Serialize,
    {
        self.set_many(&[(key, serde_json::to_value(value)?)])
    }

    /// Removes every key in one write.
    pub fn delete_many(&self, keys: &[&str]) -> Result<(), error::SystemError> {
        let (mut all, corrupt) = match self.read_all() {
            Ok(all) => (all, false),
            Err(e) => {
                log::warn!("storage file {} unreadable, resetting: {e}", self.path.display());
                (Map::new(), true)
            }
        };
        let before = all.len();
        all.retain(|k, _| !keys.contains(&k.as_str()));
        if all.len() == before && !corrupt {
            return Ok(());
        }
        self.write_all(&all)
    }
}
