use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read recipe catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse recipe catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
