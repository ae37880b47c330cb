// Fri Jan 23 2026 - Alex

use std::fmt::Write as _;

/// A minimal XML element tree: attributes in insertion order, children in
/// insertion order, so serialization is byte-stable for a given model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Serializes the tree with two-space indentation and a standard XML
    /// declaration. Empty elements self-close.
    pub fn to_document(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        self.write_indented(&mut out, 0);
        out
    }

    fn write_indented(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{}<{}", indent, self.name);
        for (key, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", key, escape(value));
        }
        if self.children.is_empty() {
            out.push_str(" />\n");
            return;
        }
        out.push_str(">\n");
        for child in &self.children {
            child.write_indented(out, depth + 1);
        }
        let _ = writeln!(out, "{}</{}>", indent, self.name);
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_closing_and_nesting() {
        let tree = Element::new("Api")
            .with_attribute("Name", "Add")
            .with_child(Element::new("Param").with_attribute("Type", "INT"))
            .with_child(Element::new("Return").with_attribute("Type", "INT"));
        let doc = tree.to_document();
        assert!(doc.contains("<Api Name=\"Add\">"));
        assert!(doc.contains("  <Param Type=\"INT\" />"));
        assert!(doc.contains("</Api>"));
    }

    #[test]
    fn test_attribute_escaping() {
        let tree = Element::new("Param").with_attribute("Type", "wchar_t*<&>\"");
        let doc = tree.to_document();
        assert!(doc.contains("Type=\"wchar_t*&lt;&amp;&gt;&quot;\""));
    }

    #[test]
    fn test_serialization_is_stable() {
        let build = || {
            Element::new("Root")
                .with_attribute("A", "1")
                .with_attribute("B", "2")
                .with_child(Element::new("Leaf"))
        };
        assert_eq!(build().to_document(), build().to_document());
    }
}
