// Thu Jan 22 2026 - Alex

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load the C/C++ grammar: {0}")]
    Grammar(String),
    #[error("the parser produced no tree for {0}")]
    NoTree(String),
}
