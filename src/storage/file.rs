use std::io::ErrorKind;
use std::fmt::Write as _;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{KeyValueStorage, StorageError};

/// Directory-backed store: one file per key.
///
/// Writes land in a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous blob intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a storage key to a file name, one key per file.
    ///
    /// Bytes outside `[A-Za-z0-9.-]`, `_` included, are written as `_XX` hex,
    /// so `@MyApp:stock-native-app` is `_40MyApp_3Astock-native-app.json`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-') {
                name.push(byte as char);
            } else {
                let _ = write!(name, "_{byte:02X}");
            }
        }
        name.push_str(".json");
        self.root.join(name)
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No stored blob");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let written = match tokio::fs::write(&tmp, &value).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %cleanup, "Temp file left behind");
                }
            }
            return Err(e.into());
        }
        debug!(path = %path.display(), bytes = value.len(), "Blob written");
        Ok(())
    }
}
