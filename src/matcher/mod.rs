// Wed Jan 21 2026 - Alex

pub mod matcher;

pub use matcher::{match_exports, MatchResult};
