// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed key-value store with an in-memory read-through cache.
//!
//! The whole map is loaded once at open and kept in memory; every mutation
//! rewrites the backing file. An in-memory-only mode exists for tests and
//! for degraded startup when the backing file cannot be opened.

use crate::error::AppError;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Durable key-value store.
#[derive(Debug)]
pub struct KvStore {
    /// Backing file; None means in-memory only.
    path: Option<PathBuf>,
    map: DashMap<String, String>,
}

impl KvStore {
    /// Open a store backed by the given file.
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file
    /// is logged and also yields an empty store; it will be overwritten on
    /// the next mutation.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::Storage(format!("create {}: {}", parent.display(), e)))?;
            }
        }

        let map = DashMap::new();
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => {
                    for (k, v) in entries {
                        map.insert(k, v);
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Corrupt storage file, starting empty");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read storage file, starting empty");
            }
        }

        tracing::debug!(path = %path.display(), entries = map.len(), "Storage opened");

        Ok(Self {
            path: Some(path),
            map,
        })
    }

    /// Create an in-memory store (no persistence). Used by tests and as the
    /// degraded fallback when the backing file cannot be opened.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            map: DashMap::new(),
        }
    }

    /// Read a value.
    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).map(|v| v.value().clone())
    }

    /// Write a value and persist.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.map.insert(key.to_string(), value.to_string());
        self.persist().await
    }

    /// Remove a value and persist. Removing a missing key is a no-op.
    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.map.remove(key);
        self.persist().await
    }

    /// Rewrite the backing file from the in-memory map.
    async fn persist(&self) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        // BTreeMap for stable key order in the file.
        let snapshot: BTreeMap<String, String> = self
            .map
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        let contents = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| AppError::Storage(format!("serialize: {}", e)))?;

        tokio::fs::write(path, contents)
            .await
            .map_err(|e| AppError::Storage(format!("write {}: {}", path.display(), e)))
    }
}
