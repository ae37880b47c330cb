// Wed Jan 21 2026 - Alex

use thiserror::Error;

use crate::resolve::ResolveError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error("declaration '{name}' is not renderable: {source}")]
    DeclarationUnrenderable {
        name: String,
        #[source]
        source: ResolveError,
    },
}

impl ExpandError {
    pub fn unrenderable(name: &str, source: ResolveError) -> Self {
        Self::DeclarationUnrenderable {
            name: name.to_string(),
            source,
        }
    }
}
