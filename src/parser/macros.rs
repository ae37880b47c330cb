// Thu Jan 22 2026 - Alex

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Object-like `#define NAME VALUE` lines, value first, no parameters.
static DEFINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*#[ \t]*define[ \t]+([A-Za-z_]\w*)[ \t]+([^\r\n]+)")
        .expect("define pattern is a hardcoded literal")
});

/// Integer-valued macro constants collected from `-D` options and from
/// `#define` lines in the parsed headers. Used to resolve identifiers in
/// enum values and array sizes; everything else about macros is left to
/// the user, as in the upstream tool.
#[derive(Debug, Default, Clone)]
pub struct DefineTable {
    values: HashMap<String, i64>,
}

impl DefineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `NAME=VALUE` or bare `NAME` (which defines to 1, cpp-style).
    pub fn insert_cli(&mut self, spec: &str) {
        match spec.split_once('=') {
            Some((name, value)) => {
                if let Some(parsed) = parse_int_literal(strip_outer_parens(value)) {
                    self.values.insert(name.trim().to_string(), parsed);
                } else {
                    log::debug!("define '{}' is not an integer constant, ignored", spec);
                }
            }
            None => {
                self.values.insert(spec.trim().to_string(), 1);
            }
        }
    }

    /// Scans a source buffer for object-like defines with integer values.
    /// Redefinition keeps the last value seen, matching preprocessor
    /// behavior across sequential includes.
    pub fn collect(&mut self, source: &[u8]) {
        let text = String::from_utf8_lossy(source);
        for captures in DEFINE_RE.captures_iter(&text) {
            let name = &captures[1];
            let value = captures[2].trim();
            // Strip a trailing line comment before evaluating.
            let value = value.split("//").next().unwrap_or(value);
            let value = value.split("/*").next().unwrap_or(value).trim();
            if let Some(parsed) = parse_int_literal(strip_outer_parens(value)) {
                self.values.insert(name.to_string(), parsed);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn strip_outer_parens(mut text: &str) -> &str {
    text = text.trim();
    while text.starts_with('(') && text.ends_with(')') && text.len() >= 2 {
        text = text[1..text.len() - 1].trim();
    }
    text
}

/// Parses a C integer literal: decimal, hex (`0x`), binary (`0b`), octal
/// (leading `0`), optional sign, `u`/`l` suffixes, `'` digit separators.
pub(crate) fn parse_int_literal(text: &str) -> Option<i64> {
    let cleaned = text.trim().replace('\'', "");
    let mut body = cleaned.as_str();

    let negative = body.starts_with('-');
    if negative {
        body = body[1..].trim_start();
    }
    body = body.trim_end_matches(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
    if body.is_empty() {
        return None;
    }

    let value = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).ok()?
    } else if body.len() > 1 && body.starts_with('0') {
        i64::from_str_radix(&body[1..], 8).ok()?
    } else {
        body.parse::<i64>().ok()?
    };

    Some(if negative { -value } else { value })
}
