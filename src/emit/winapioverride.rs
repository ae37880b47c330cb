// Fri Jan 23 2026 - Alex

use std::fs;
use std::path::{Path, PathBuf};

use crate::diag::Diagnostics;
use crate::emit::registry::NameRegistry;
use crate::emit::EmitError;
use crate::expand::{
    render_aggregate, render_enum, render_field, render_function, render_typedef,
};
use crate::model::{CompilationModel, FunctionDecl};

/// Counts of the units each emission pass produced.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmitSummary {
    pub functions: usize,
    pub classes: usize,
    pub enums: usize,
    pub typedefs: usize,
    pub fields: usize,
    pub skipped: usize,
}

impl EmitSummary {
    pub fn total(&self) -> usize {
        self.functions + self.classes + self.enums + self.typedefs + self.fields
    }
}

/// Flat-text dialect emitter. Produces a root `<library stem>.txt` with
/// one prototype line per matched function, plus one file per declaration
/// under `classStructEnum/`, `enums/`, `typedefs/`, and `fields/`.
pub struct WinApiOverrideEmitter {
    root: PathBuf,
    library: PathBuf,
}

impl WinApiOverrideEmitter {
    pub fn new(root: impl Into<PathBuf>, library: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            library: library.into(),
        }
    }

    fn library_file_name(&self) -> String {
        self.library
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.library.display().to_string())
    }

    fn library_stem(&self) -> String {
        self.library
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string())
    }

    pub fn emit(
        &self,
        model: &CompilationModel,
        matched: &[FunctionDecl],
        diags: &mut Diagnostics,
    ) -> Result<EmitSummary, EmitError> {
        fs::create_dir_all(&self.root).map_err(|e| EmitError::create_dir(&self.root, e))?;

        let mut summary = EmitSummary::default();
        summary.functions = self.emit_functions(matched, diags, &mut summary.skipped)?;
        self.emit_user_types(model, diags, &mut summary)?;
        Ok(summary)
    }

    /// `<library>|<prototype>;` lines behind the fixed comment header.
    fn emit_functions(
        &self,
        matched: &[FunctionDecl],
        diags: &mut Diagnostics,
        skipped: &mut usize,
    ) -> Result<usize, EmitError> {
        let library = self.library_file_name();
        let mut contents = format!(
            ";Monitoring file generated for exports table of {} by dll-header-parser\n\n",
            library
        );
        let mut written = 0usize;
        for func in matched {
            match render_function(func) {
                Ok(prototype) => {
                    contents.push_str(&format!("{}|{};\n", library, prototype));
                    written += 1;
                }
                Err(e) => {
                    diags.warn(format!("skipping function {}: {}", func.name, e));
                    *skipped += 1;
                }
            }
        }

        let path = self.root.join(format!("{}.txt", self.library_stem()));
        fs::write(&path, contents).map_err(|e| EmitError::write(&path, e))?;
        Ok(written)
    }

    fn emit_user_types(
        &self,
        model: &CompilationModel,
        diags: &mut Diagnostics,
        summary: &mut EmitSummary,
    ) -> Result<(), EmitError> {
        // classStructEnum/
        let dir = self.category_dir("classStructEnum")?;
        let mut registry = NameRegistry::new();
        for class in &model.classes {
            if class.is_anonymous() {
                // Reachable only through a typedef; rendered there.
                log::debug!("anonymous aggregate skipped in classStructEnum pass");
                continue;
            }
            match render_aggregate(class, diags) {
                Ok(body) => {
                    let name = self.claim(&mut registry, &class.name, diags);
                    self.write_unit(&dir, &name, &body)?;
                    summary.classes += 1;
                }
                Err(e) => {
                    diags.warn(format!("skipping {}: {}", class.name, e));
                    summary.skipped += 1;
                }
            }
        }

        // enums/
        let dir = self.category_dir("enums")?;
        let mut registry = NameRegistry::new();
        for decl in &model.enums {
            let decl = if decl.is_anonymous() {
                match decl.items.first() {
                    Some(first) => {
                        diags.warn(format!("unnamed enum being written as {}.txt", first.name));
                        decl.renamed(&first.name)
                    }
                    None => {
                        diags.warn("unnamed enum with no items skipped".to_string());
                        summary.skipped += 1;
                        continue;
                    }
                }
            } else {
                decl.clone()
            };
            let name = self.claim(&mut registry, &decl.name, diags);
            self.write_unit(&dir, &name, &render_enum(&decl))?;
            summary.enums += 1;
        }

        // typedefs/
        let dir = self.category_dir("typedefs")?;
        let mut registry = NameRegistry::new();
        for typedef in &model.typedefs {
            match render_typedef(typedef, model, diags) {
                Ok(Some(body)) => {
                    let name = self.claim(&mut registry, &typedef.name, diags);
                    self.write_unit(&dir, &name, &body)?;
                    summary.typedefs += 1;
                }
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    diags.warn(format!("skipping {}: {}", typedef.name, e));
                    summary.skipped += 1;
                }
            }
        }

        // fields/
        let dir = self.category_dir("fields")?;
        let mut registry = NameRegistry::new();
        for field in &model.fields {
            match render_field(field) {
                Ok(body) => {
                    let name = self.claim(&mut registry, &field.name, diags);
                    self.write_unit(&dir, &name, &body)?;
                    summary.fields += 1;
                }
                Err(e) => {
                    diags.warn(format!("skipping {}: {}", field.name, e));
                    summary.skipped += 1;
                }
            }
        }

        Ok(())
    }

    fn category_dir(&self, category: &str) -> Result<PathBuf, EmitError> {
        let dir = self.root.join(category);
        fs::create_dir_all(&dir).map_err(|e| EmitError::create_dir(&dir, e))?;
        Ok(dir)
    }

    fn claim(&self, registry: &mut NameRegistry, name: &str, diags: &mut Diagnostics) -> String {
        let claimed = registry.claim(name);
        if let Some(original) = &claimed.renamed_from {
            diags.warn(format!(
                "{}.txt already exists, renaming to {}.txt",
                original, claimed.name
            ));
        }
        claimed.name
    }

    fn write_unit(&self, dir: &Path, name: &str, contents: &str) -> Result<(), EmitError> {
        let path = dir.join(format!("{}.txt", name));
        fs::write(&path, contents).map_err(|e| EmitError::write(&path, e))
    }
}
