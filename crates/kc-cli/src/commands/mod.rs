pub mod check_ops;
pub mod config_ops;
pub mod decide_ops;
pub mod type_ops;

use std::path::Path;

use kc_content::{DirFetcher, FetchError};
use kc_core::settings::Settings;
use kc_core::{CatalogError, MappingError};
use kc_engine::CompositorError;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}
pub(crate) use die;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Compositor(#[from] CompositorError),
    #[error("language {0:?} is not in the catalog")]
    UnknownLanguage(String),
}

pub(crate) fn dir_fetcher(dir: &Path, settings: &Settings) -> DirFetcher {
    DirFetcher::new(dir, &settings.resources)
}
