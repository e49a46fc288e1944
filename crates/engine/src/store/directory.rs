//! File system backend: `<root>/<collection>/<key>.json`.

use async_trait::async_trait;
use serde_json::Value;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use super::{DocumentStore, validate_name};
use crate::{EngineError, ResultEngine};

const EXTENSION: &str = "json";

#[derive(Debug)]
pub struct DirectoryStore {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl DirectoryStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> ResultEngine<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::debug!("document directory ready at {}", root.display());
        Ok(Self {
            root,
            tmp_counter: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> ResultEngine<PathBuf> {
        validate_name("collection", collection)?;
        Ok(self.root.join(collection))
    }
}

#[async_trait]
impl DocumentStore for DirectoryStore {
    async fn put(&self, collection: &str, key: &str, document: &Value) -> ResultEngine<()> {
        validate_name("key", key)?;
        let dir = self.collection_dir(collection)?;
        tokio::fs::create_dir_all(&dir).await?;

        let body = serde_json::to_vec_pretty(document)?;
        let path = dir.join(format!("{key}.{EXTENSION}"));
        // Readers only pick up `.json` files, so the document becomes
        // visible once fully written.
        let seq = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let tmp = dir.join(format!(".{key}.{seq}.tmp"));

        tokio::fs::write(&tmp, body).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn get_all(&self, collection: &str) -> ResultEngine<Vec<Value>> {
        let dir = self.collection_dir(collection)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            if entry.file_type().await?.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let body = tokio::fs::read(&path).await?;
            let document = serde_json::from_slice(&body).map_err(|err| {
                EngineError::Persistence(format!("{}: {err}", path.display()))
            })?;
            documents.push(document);
        }
        Ok(documents)
    }
}
