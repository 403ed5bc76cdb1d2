//! Resource access for the catalog and per-language mapping tables.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use kc_core::settings::ResourceSettings;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("IO error: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("resource not found: {0}")]
    NotFound(String),
}

/// Source of the extension's bundled resources.
///
/// Called from the mapping loader thread, hence `Send + Sync`.
pub trait ResourceFetcher: Send + Sync {
    /// Raw catalog resource (JSON array of languages).
    fn fetch_catalog(&self) -> Result<String, FetchError>;
    /// Raw mapping resource for `code` (flat JSON object).
    fn fetch_mapping(&self, code: &str) -> Result<String, FetchError>;
}

/// Reads resources from a directory laid out like the extension's
/// `mappings/` folder.
pub struct DirFetcher {
    root: PathBuf,
    resources: ResourceSettings,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>, resources: &ResourceSettings) -> Self {
        Self {
            root: root.into(),
            resources: resources.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, name: &str) -> Result<String, FetchError> {
        let path = self.root.join(name);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.display().to_string()))
            }
            Err(source) => Err(FetchError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

/// Language codes name files; anything that could escape the resource
/// directory is refused.
fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl ResourceFetcher for DirFetcher {
    fn fetch_catalog(&self) -> Result<String, FetchError> {
        self.read(&self.resources.catalog)
    }

    fn fetch_mapping(&self, code: &str) -> Result<String, FetchError> {
        if !is_valid_code(code) {
            return Err(FetchError::NotFound(code.to_string()));
        }
        self.read(&self.resources.mapping_resource(code))
    }
}
