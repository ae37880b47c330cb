// Tue Jan 20 2026 - Alex

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::parser::ParserOptions;

/// Everything one run consumes: inputs, parser surface, exclusions, and
/// output toggles. Built from the CLI arguments; `validate` runs before
/// any I/O happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub binary: PathBuf,
    pub files: Vec<PathBuf>,
    pub folders: Vec<PathBuf>,
    pub excluded_symbols: Vec<String>,
    pub include_folders: Vec<PathBuf>,
    pub system_include_folders: Vec<PathBuf>,
    pub defines: Vec<String>,
    pub additional_arguments: Vec<String>,
    pub parse_as_cpp: bool,
    pub parse_macros: bool,
    pub parse_attributes: bool,
    pub gen_winapioverride: bool,
    pub winapi_folder: PathBuf,
    pub gen_apimonitor: bool,
    pub xml_folder: PathBuf,
    pub report_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binary: PathBuf::new(),
            files: Vec::new(),
            folders: Vec::new(),
            excluded_symbols: Vec::new(),
            include_folders: Vec::new(),
            system_include_folders: Vec::new(),
            defines: Vec::new(),
            additional_arguments: Vec::new(),
            parse_as_cpp: true,
            parse_macros: true,
            parse_attributes: true,
            gen_winapioverride: false,
            winapi_folder: PathBuf::from("./OutputWinApi/"),
            gen_apimonitor: false,
            xml_folder: PathBuf::from("./OutputApiMonitor/"),
            report_file: None,
            log_file: None,
            verbose: false,
            show_progress: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(mut self, binary: PathBuf) -> Self {
        self.binary = binary;
        self
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }

    pub fn with_folders(mut self, folders: Vec<PathBuf>) -> Self {
        self.folders = folders;
        self
    }

    pub fn with_outputs(mut self, winapioverride: bool, apimonitor: bool) -> Self {
        self.gen_winapioverride = winapioverride;
        self.gen_apimonitor = apimonitor;
        self
    }

    /// The slice of this configuration forwarded to the header parser.
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            include_folders: self.include_folders.clone(),
            system_include_folders: self.system_include_folders.clone(),
            defines: self.defines.clone(),
            additional_arguments: self.additional_arguments.clone(),
            parse_as_cpp: self.parse_as_cpp,
            parse_macros: self.parse_macros,
            parse_attributes: self.parse_attributes,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.binary.as_os_str().is_empty() {
            return Err("a target binary must be set".to_string());
        }
        if self.files.is_empty() && self.folders.is_empty() {
            return Err("at least one input file or folder must be set".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_inputs() {
        let config = Config::new().with_binary(PathBuf::from("a.dll"));
        assert!(config.validate().is_err());

        let config = config.with_files(vec![PathBuf::from("a.h")]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parser_options_forwarding() {
        let mut config = Config::new();
        config.defines = vec!["WINVER=0x0601".to_string()];
        config.parse_as_cpp = false;
        let options = config.parser_options();
        assert_eq!(options.defines, config.defines);
        assert!(!options.parse_as_cpp);
    }
}
