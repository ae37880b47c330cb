// Fri Jan 23 2026 - Alex

use std::fs;
use std::path::{Path, PathBuf};

use crate::diag::Diagnostics;
use crate::emit::element::Element;
use crate::emit::EmitError;
use crate::model::{CompilationModel, FunctionDecl};
use crate::resolve::resolve;

/// Structured-dialect emitter. Builds the ApiMonitor element tree in
/// memory; serialization and destination are thin wrappers around the
/// deterministic element writer.
pub struct ApiMonitorEmitter {
    root: PathBuf,
    library: PathBuf,
}

impl ApiMonitorEmitter {
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

    /// Builds the full element tree for the matched declarations. Pure:
    /// rendering failures skip the affected declaration through the
    /// diagnostics sink, nothing is written.
    pub fn build_tree(
        &self,
        model: &CompilationModel,
        matched: &[FunctionDecl],
        diags: &mut Diagnostics,
    ) -> Element {
        let mut root = Element::new("ApiMonitor").with_child(
            Element::new("Include").with_attribute("FileName", "Headers\\common.h.xml"),
        );

        let mut module = Element::new("Module").with_attribute("Name", &self.library_file_name());

        for variable in self.build_variables(model, diags) {
            module.add_child(variable);
        }
        for func in matched {
            match self.build_api(func) {
                Ok(api) => module.add_child(api),
                Err(message) => diags.warn(message),
            }
        }

        root.add_child(module);
        root
    }

    fn build_api(&self, func: &FunctionDecl) -> Result<Element, String> {
        let mut api = Element::new("Api").with_attribute("Name", &func.name);
        for param in &func.parameters {
            let ty = resolve(&param.ty)
                .map_err(|e| format!("skipping function {}: {}", func.name, e))?;
            api.add_child(
                Element::new("Param")
                    .with_attribute("Type", &ty)
                    .with_attribute("Name", &param.name),
            );
        }
        let ret = resolve(&func.return_type)
            .map_err(|e| format!("skipping function {}: {}", func.name, e))?;
        api.add_child(Element::new("Return").with_attribute("Type", &ret));
        Ok(api)
    }

    /// Variable entries for aggregates, enums, and typedefs.
    fn build_variables(&self, model: &CompilationModel, diags: &mut Diagnostics) -> Vec<Element> {
        let mut variables = Vec::new();

        for class in model.classes.iter().filter(|c| !c.is_anonymous()) {
            let mut variable = Element::new("Variable")
                .with_attribute("Name", &class.name)
                .with_attribute("Type", class.kind.keyword());
            let mut complete = true;
            for field in &class.fields {
                match resolve(&field.ty) {
                    Ok(ty) => variable.add_child(
                        Element::new("Field")
                            .with_attribute("Type", &ty)
                            .with_attribute("Name", &field.name),
                    ),
                    Err(e) => {
                        diags.warn(format!("skipping {}: {}", class.name, e));
                        complete = false;
                        break;
                    }
                }
            }
            if complete {
                variables.push(variable);
            }
        }

        for decl in model.enums.iter().filter(|e| !e.is_anonymous()) {
            let mut variable = Element::new("Variable")
                .with_attribute("Name", &decl.name)
                .with_attribute("Type", "enum");
            for item in &decl.items {
                variable.add_child(
                    Element::new("Set")
                        .with_attribute("Name", &item.name)
                        .with_attribute("Value", &item.value.to_string()),
                );
            }
            variables.push(variable);
        }

        for typedef in &model.typedefs {
            match resolve(&typedef.element) {
                Ok(ty) => variables.push(
                    Element::new("Variable")
                        .with_attribute("Name", &typedef.name)
                        .with_attribute("Type", &ty),
                ),
                Err(e) => diags.warn(format!("skipping {}: {}", typedef.name, e)),
            }
        }

        variables
    }

    /// Serializes the tree to `<root>/<library stem>.xml`.
    pub fn emit(
        &self,
        model: &CompilationModel,
        matched: &[FunctionDecl],
        diags: &mut Diagnostics,
    ) -> Result<PathBuf, EmitError> {
        fs::create_dir_all(&self.root).map_err(|e| EmitError::create_dir(&self.root, e))?;
        let tree = self.build_tree(model, matched, diags);
        let path = self.root.join(format!("{}.xml", self.library_stem()));
        self.write_document(&path, &tree)?;
        Ok(path)
    }

    fn write_document(&self, path: &Path, tree: &Element) -> Result<(), EmitError> {
        fs::write(path, tree.to_document()).map_err(|e| EmitError::write(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Parameter, PrimitiveKind, TypeNode, TypedefDecl};

    fn int() -> TypeNode {
        TypeNode::Primitive(PrimitiveKind::Int)
    }

    #[test]
    fn test_api_element_shape() {
        let emitter = ApiMonitorEmitter::new("unused", "credui.dll");
        let matched = vec![FunctionDecl::new("CredFind", TypeNode::Primitive(PrimitiveKind::Bool))
            .with_parameter(Parameter::new("TargetName", TypeNode::pointer_to(
                TypeNode::Primitive(PrimitiveKind::WChar),
            )))
            .with_parameter(Parameter::new("Flags", TypeNode::Primitive(PrimitiveKind::ULong)))];
        let model = CompilationModel::default();
        let mut diags = Diagnostics::new();
        let tree = emitter.build_tree(&model, &matched, &mut diags);

        assert_eq!(tree.name(), "ApiMonitor");
        assert_eq!(tree.children()[0].name(), "Include");
        assert_eq!(
            tree.children()[0].attribute("FileName"),
            Some("Headers\\common.h.xml")
        );

        let module = &tree.children()[1];
        assert_eq!(module.attribute("Name"), Some("credui.dll"));
        let api = &module.children()[0];
        assert_eq!(api.attribute("Name"), Some("CredFind"));
        assert_eq!(api.child_count(), 3);
        assert_eq!(api.children()[0].attribute("Type"), Some("wchar_t*"));
        assert_eq!(api.children()[0].attribute("Name"), Some("TargetName"));
        assert_eq!(api.children()[2].name(), "Return");
        assert_eq!(api.children()[2].attribute("Type"), Some("BOOL"));
    }

    #[test]
    fn test_unrenderable_api_is_skipped_with_diagnostic() {
        let emitter = ApiMonitorEmitter::new("unused", "a.dll");
        let matched = vec![
            FunctionDecl::new("Bad", TypeNode::Unexposed("X".into())),
            FunctionDecl::new("Good", int()),
        ];
        let model = CompilationModel::default();
        let mut diags = Diagnostics::new();
        let tree = emitter.build_tree(&model, &matched, &mut diags);

        let module = &tree.children()[1];
        assert_eq!(module.child_count(), 1);
        assert_eq!(module.children()[0].attribute("Name"), Some("Good"));
        assert_eq!(diags.warning_count(), 1);
    }

    #[test]
    fn test_typedef_variables() {
        let emitter = ApiMonitorEmitter::new("unused", "a.dll");
        let mut model = CompilationModel::default();
        model.typedefs.push(TypedefDecl {
            name: "DWORD".to_string(),
            element: TypeNode::Primitive(PrimitiveKind::ULong),
            source_file: None,
        });
        let mut diags = Diagnostics::new();
        let tree = emitter.build_tree(&model, &[], &mut diags);

        let module = &tree.children()[1];
        let variable = &module.children()[0];
        assert_eq!(variable.attribute("Name"), Some("DWORD"));
        assert_eq!(variable.attribute("Type"), Some("ULONG"));
    }

    #[test]
    fn test_tree_is_deterministic() {
        let emitter = ApiMonitorEmitter::new("unused", "a.dll");
        let matched = vec![FunctionDecl::new("F", int())];
        let model = CompilationModel::default();
        let mut d1 = Diagnostics::new();
        let mut d2 = Diagnostics::new();
        let a = emitter.build_tree(&model, &matched, &mut d1).to_document();
        let b = emitter.build_tree(&model, &matched, &mut d2).to_document();
        assert_eq!(a, b);
    }
}
