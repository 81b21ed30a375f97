//! Runtime configuration.

use crate::error::{CatalogError, CatalogResult};
use crate::resource::DEFAULT_CATEGORY;
use std::{env, path::PathBuf};

/// Where the catalog keeps its state and how the front-ends reach it.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// JSON snapshot of the resource table.
    pub store_path: PathBuf,
    /// Bincode snapshot of the vector index.
    pub index_path: PathBuf,
    /// Category given to resources stored without one.
    pub default_category: String,
    /// Length of the vectors produced by the embedder.
    pub embedding_dim: usize,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            store_path: "catalog.json".into(),
            index_path: "catalog.index".into(),
            default_category: DEFAULT_CATEGORY.to_string(),
            embedding_dim: 384,
            bind_addr: "0.0.0.0:7878".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Defaults overridden by `RESCAT_STORE`, `RESCAT_INDEX`,
    /// `RESCAT_CATEGORY`, `RESCAT_DIM` and `RESCAT_BIND`.
    pub fn from_env() -> CatalogResult<CatalogConfig> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CatalogResult<CatalogConfig> {
        let mut config = CatalogConfig::default();

        if let Some(path) = lookup("RESCAT_STORE") {
            config.store_path = path.into();
        }
        if let Some(path) = lookup("RESCAT_INDEX") {
            config.index_path = path.into();
        }
        if let Some(category) = lookup("RESCAT_CATEGORY") {
            config.default_category = category;
        }
        if let Some(dim) = lookup("RESCAT_DIM") {
            config.embedding_dim = match dim.trim().parse::<usize>() {
                Ok(d) if d > 0 => d,
                _ => {
                    return Err(CatalogError::InvalidInput(format!(
                        "RESCAT_DIM must be a positive integer, got '{}'",
                        dim
                    )))
                }
            };
        }
        if let Some(addr) = lookup("RESCAT_BIND") {
            config.bind_addr = addr;
        }

        Ok(config)
    }
}
