// Wed Jan 21 2026 - Alex

use goblin::elf::sym::{STB_GLOBAL, STB_WEAK};
use goblin::mach::Mach;
use goblin::Object;
use indexmap::IndexSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::exports::ExportError;

/// The set of symbol names a binary publishes for external linkage,
/// in the order the export table lists them.
#[derive(Debug, Clone)]
pub struct ExportedSymbols {
    path: PathBuf,
    names: IndexSet<String>,
}

impl ExportedSymbols {
    /// Reads the export table of a PE, ELF, or Mach-O binary.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let path = path.as_ref().to_path_buf();
        let data = fs::read(&path)?;
        let names = Self::parse_exports(&data)?;
        Ok(Self { path, names })
    }

    fn parse_exports(data: &[u8]) -> Result<IndexSet<String>, ExportError> {
        let mut names = IndexSet::new();

        match Object::parse(data)? {
            Object::PE(pe) => {
                for export in &pe.exports {
                    if let Some(name) = export.name {
                        names.insert(name.to_string());
                    }
                }
            }
            Object::Elf(elf) => {
                for sym in elf.dynsyms.iter() {
                    let bind = sym.st_bind();
                    if (bind != STB_GLOBAL && bind != STB_WEAK) || sym.is_import() {
                        continue;
                    }
                    if let Some(name) = elf.dynstrtab.get_at(sym.st_name) {
                        if !name.is_empty() {
                            names.insert(name.to_string());
                        }
                    }
                }
            }
            Object::Mach(Mach::Binary(macho)) => {
                for export in macho.exports()? {
                    // Mach-O C symbols carry a leading underscore that the
                    // header declarations do not.
                    let name = export.name.strip_prefix('_').unwrap_or(&export.name);
                    if !name.is_empty() {
                        names.insert(name.to_string());
                    }
                }
            }
            Object::Mach(Mach::Fat(_)) => {
                return Err(ExportError::Unsupported(
                    "fat Mach-O binaries are not supported".to_string(),
                ));
            }
            _ => {
                return Err(ExportError::Unsupported(
                    "not a PE, ELF, or Mach-O binary".to_string(),
                ));
            }
        }

        Ok(names)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn names(&self) -> &IndexSet<String> {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
