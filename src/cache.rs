//! Parsed datasets memoized by grid content
//!
//! Parsing is pure, so a dataset can be reused for as long as the grid
//! content is unchanged. Entries are shared as `Arc` and never mutated.

use crate::config::ParserConfig;
use crate::parser::SheetParser;
use crate::types::{ParsedDataset, RawGrid};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Most entries kept before the cache is cleared
const MAX_ENTRIES: usize = 32;

#[derive(Debug, Default)]
pub struct DatasetCache {
    parser: SheetParser,
    entries: Mutex<HashMap<u64, Arc<ParsedDataset>>>,
}

impl DatasetCache {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            parser: SheetParser::new(config),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Dataset for `grid`, parsed at most once per distinct content
    pub fn get_or_parse(&self, grid: &RawGrid) -> Arc<ParsedDataset> {
        let key = grid.content_hash();
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(hit) = entries.get(&key) {
            debug!(key, "dataset cache hit");
            return Arc::clone(hit);
        }

        if entries.len() >= MAX_ENTRIES {
            entries.clear();
        }

        let dataset = Arc::new(self.parser.assemble(grid));
        entries.insert(key, Arc::clone(&dataset));
        debug!(key, records = dataset.len(), "dataset cached");
        dataset
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
