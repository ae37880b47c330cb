// Thu Jan 22 2026 - Alex

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Options forwarded to the header-parser collaborator. The parse itself
/// is syntactic; include folders and additional arguments are carried for
/// interface parity with the upstream tooling and surfaced in verbose
/// output, while defines and the macro toggle feed the integer-constant
/// table used for enum values and array sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserOptions {
    pub include_folders: Vec<PathBuf>,
    pub system_include_folders: Vec<PathBuf>,
    pub defines: Vec<String>,
    pub additional_arguments: Vec<String>,
    pub parse_as_cpp: bool,
    pub parse_macros: bool,
    pub parse_attributes: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            include_folders: Vec::new(),
            system_include_folders: Vec::new(),
            defines: Vec::new(),
            additional_arguments: Vec::new(),
            parse_as_cpp: true,
            parse_macros: true,
            parse_attributes: true,
        }
    }
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defines(mut self, defines: Vec<String>) -> Self {
        self.defines = defines;
        self
    }

    pub fn with_include_folders(mut self, folders: Vec<PathBuf>) -> Self {
        self.include_folders = folders;
        self
    }

    pub fn with_parse_as_cpp(mut self, cpp: bool) -> Self {
        self.parse_as_cpp = cpp;
        self
    }

    pub fn with_parse_macros(mut self, macros: bool) -> Self {
        self.parse_macros = macros;
        self
    }
}
