//! Atomically swappable snapshot of the reference tables

use crate::config::TablesConfig;
use crate::error::Result;
use crate::reference::tables::ReferenceTables;
use log::info;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Holds the current table snapshot. Readers clone the `Arc` and keep a
/// consistent version for as long as they hold it; reloads swap the pointer.
#[derive(Debug)]
pub struct TableStore {
    current: RwLock<Arc<ReferenceTables>>,
}

impl TableStore {
    pub fn new(tables: ReferenceTables) -> Self {
        Self {
            current: RwLock::new(Arc::new(tables)),
        }
    }

    /// Store seeded from the configured file, or the embedded tables
    pub fn from_config(config: &TablesConfig) -> Result<Self> {
        let tables = match &config.path {
            Some(path) => ReferenceTables::from_path(path)?,
            None => ReferenceTables::embedded()?,
        };
        info!("Reference tables v{} ready", tables.version());
        Ok(Self::new(tables))
    }

    pub fn snapshot(&self) -> Arc<ReferenceTables> {
        Arc::clone(&self.current.read())
    }

    /// Swap in new tables, returning the previous snapshot
    pub fn replace(&self, tables: ReferenceTables) -> Arc<ReferenceTables> {
        let next = Arc::new(tables);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        info!(
            "Swapped reference tables v{} -> v{}",
            previous.version(),
            self.current.read().version()
        );
        previous
    }

    /// Parse and validate a file, then swap it in. On error the current
    /// snapshot is left untouched.
    pub fn reload_from_path(&self, path: &Path) -> Result<Arc<ReferenceTables>> {
        let tables = ReferenceTables::from_path(path)?;
        self.replace(tables);
        Ok(self.snapshot())
    }
}
