//! Process-wide cache of loaded mapping tables.
//!
//! Tables are fetched and parsed on a background loader thread. Results are
//! only applied by `poll`/`settle` on the owning thread, so the cache itself
//! is plain single-threaded state.

use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use tracing::{debug, error};

use kc_core::settings::CacheSettings;
use kc_core::{MappingError, MappingTable};

use crate::fetch::{FetchError, ResourceFetcher};

/// Why a mapping table could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid mapping: {0}")]
    Mapping(#[from] MappingError),
    #[error("mapping loader is not running")]
    LoaderGone,
}

/// Observable state of one language in the cache.
#[derive(Debug, Clone)]
pub enum MappingState {
    Unloaded,
    Loading,
    Ready(Arc<MappingTable>),
    Failed,
}

enum Entry {
    Loading,
    Ready(Arc<MappingTable>),
    Failed,
}

// ---------------------------------------------------------------------------
// Loader thread
// ---------------------------------------------------------------------------

struct LoadWork {
    code: String,
}

struct LoadResult {
    code: String,
    result: Result<MappingTable, LoadError>,
}

struct Loader {
    work_tx: mpsc::Sender<LoadWork>,
    result_rx: mpsc::Receiver<LoadResult>,
}

impl Loader {
    fn spawn(fetcher: Arc<dyn ResourceFetcher>) -> io::Result<Self> {
        let (work_tx, work_rx) = mpsc::channel::<LoadWork>();
        let (result_tx, result_rx) = mpsc::channel::<LoadResult>();
        thread::Builder::new()
            .name("kc-loader".into())
            .spawn(move || loader_worker(work_rx, result_tx, fetcher))?;
        Ok(Self { work_tx, result_rx })
    }
}

fn loader_worker(
    rx: mpsc::Receiver<LoadWork>,
    tx: mpsc::Sender<LoadResult>,
    fetcher: Arc<dyn ResourceFetcher>,
) {
    while let Ok(work) = rx.recv() {
        let result = fetcher
            .fetch_mapping(&work.code)
            .map_err(LoadError::from)
            .and_then(|json| MappingTable::from_json(&json).map_err(LoadError::from));
        if tx
            .send(LoadResult {
                code: work.code,
                result,
            })
            .is_err()
        {
            // Cache dropped.
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// MappingCache
// ---------------------------------------------------------------------------

/// Language code → mapping table, with at most one load in flight per code.
pub struct MappingCache {
    entries: HashMap<String, Entry>,
    loader: Loader,
    in_flight: usize,
    retry_failed: bool,
}

impl MappingCache {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, settings: &CacheSettings) -> io::Result<Self> {
        Ok(Self {
            entries: HashMap::new(),
            loader: Loader::spawn(fetcher)?,
            in_flight: 0,
            retry_failed: settings.retry_failed,
        })
    }

    /// Start loading `code` unless it is already loading or loaded.
    ///
    /// A failed language is tried again only when `retry_failed` is set.
    /// Returns true when a fetch was submitted.
    pub fn load(&mut self, code: &str) -> bool {
        match self.entries.get(code) {
            Some(Entry::Loading) | Some(Entry::Ready(_)) => return false,
            Some(Entry::Failed) if !self.retry_failed => return false,
            _ => {}
        }

        let work = LoadWork {
            code: code.to_string(),
        };
        if self.loader.work_tx.send(work).is_err() {
            error!(code, error = %LoadError::LoaderGone, "cannot load mapping");
            self.entries.insert(code.to_string(), Entry::Failed);
            return false;
        }

        debug!(code, "loading mapping");
        self.entries.insert(code.to_string(), Entry::Loading);
        self.in_flight += 1;
        true
    }

    /// Current state of `code`. Never blocks.
    pub fn get(&self, code: &str) -> MappingState {
        match self.entries.get(code) {
            None => MappingState::Unloaded,
            Some(Entry::Loading) => MappingState::Loading,
            Some(Entry::Ready(table)) => MappingState::Ready(Arc::clone(table)),
            Some(Entry::Failed) => MappingState::Failed,
        }
    }

    /// Apply every finished load without blocking. Returns how many were
    /// applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(result) = self.loader.result_rx.try_recv() {
            self.apply(result);
            applied += 1;
        }
        applied
    }

    /// Block until no load is in flight.
    pub fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.loader.result_rx.recv() {
                Ok(result) => self.apply(result),
                Err(_) => {
                    error!(error = %LoadError::LoaderGone, "abandoning in-flight mapping loads");
                    for entry in self.entries.values_mut() {
                        if matches!(entry, Entry::Loading) {
                            *entry = Entry::Failed;
                        }
                    }
                    self.in_flight = 0;
                }
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn apply(&mut self, loaded: LoadResult) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let entry = match loaded.result {
            Ok(table) => {
                debug!(code = %loaded.code, keys = table.len(), "mapping loaded");
                Entry::Ready(Arc::new(table))
            }
            Err(e) => {
                error!(code = %loaded.code, error = %e, "failed to load mapping");
                Entry::Failed
            }
        };
        self.entries.insert(loaded.code, entry);
    }
}
