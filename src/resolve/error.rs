// Wed Jan 21 2026 - Alex

use thiserror::Error;

use crate::model::PrimitiveKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("primitive kind {0:?} has no monitoring-dialect spelling")]
    UnsupportedPrimitive(PrimitiveKind),
    #[error("type kind '{0}' is not representable in the monitoring dialects")]
    UnsupportedTypeKind(&'static str),
}
