// Wed Jan 21 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse binary: {0}")]
    Parse(#[from] goblin::error::Error),
    #[error("unsupported binary format: {0}")]
    Unsupported(String),
}
