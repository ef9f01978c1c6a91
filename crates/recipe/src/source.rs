use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::catalog::RecipeCatalog;
use crate::error::CatalogError;

/// Where the recipe catalog comes from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<RecipeCatalog, CatalogError>;
}

/// Catalog backed by a JSON file on disk. The file is reread on every
/// call, so catalog edits show up without a restart.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn load(&self) -> Result<RecipeCatalog, CatalogError> {
        let bytes = tokio::fs::read(&self.path).await?;
        RecipeCatalog::from_slice(&bytes)
    }
}
