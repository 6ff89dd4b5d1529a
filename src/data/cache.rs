use std::collections::VecDeque;
use std::sync::Arc;

use log::debug;
use sha2::{Digest, Sha256};

use super::loader;
use super::model::Table;
use crate::error::VizResult;

/// Identity of a parsed source: content fingerprint plus the arguments
/// that change how the bytes are read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    fingerprint: [u8; 32],
    source_name: String,
    sheet_name: Option<String>,
}

impl CacheKey {
    pub fn new(bytes: &[u8], source_name: &str, sheet_name: Option<&str>) -> Self {
        CacheKey {
            fingerprint: Sha256::digest(bytes).into(),
            source_name: source_name.to_string(),
            sheet_name: sheet_name.map(str::to_string),
        }
    }
}

/// Bounded least-recently-used cache of loaded tables.
///
/// Only successful loads are stored. Eviction never affects correctness:
/// a miss simply re-parses.
#[derive(Debug)]
pub struct TableCache {
    capacity: usize,
    /// Most recently used at the back.
    entries: VecDeque<(CacheKey, Arc<Table>)>,
}

impl TableCache {
    pub fn new(capacity: usize) -> Self {
        TableCache {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Return the cached table for these inputs, loading it on a miss.
    pub fn load(
        &mut self,
        bytes: &[u8],
        source_name: &str,
        sheet_name: Option<&str>,
    ) -> VizResult<Arc<Table>> {
        let key = CacheKey::new(bytes, source_name, sheet_name);

        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            if let Some(entry) = self.entries.remove(pos) {
                debug!("Table cache hit for '{source_name}'");
                let table = Arc::clone(&entry.1);
                self.entries.push_back(entry);
                return Ok(table);
            }
        }

        let table = Arc::new(loader::load(bytes, source_name, sheet_name)?);
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((key, Arc::clone(&table)));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
