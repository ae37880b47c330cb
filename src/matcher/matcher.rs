// Wed Jan 21 2026 - Alex

use indexmap::IndexSet;
use std::collections::HashSet;

use crate::diag::Diagnostics;
use crate::model::FunctionDecl;

/// Outcome of intersecting the exported-symbol list with the parsed
/// declarations. Every candidate name (exported minus excluded) lands in
/// exactly one partition: `matched` holds declarations in their original
/// declaration order, `unmatched` holds leftover names in export order.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    pub matched: Vec<FunctionDecl>,
    pub unmatched: Vec<String>,
}

impl MatchResult {
    pub fn matched_names(&self) -> Vec<&str> {
        self.matched.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Matches exported symbol names against parsed function declarations.
///
/// Matching is exact, case-sensitive name equality only; the C-style
/// export symbol space has no overloading to disambiguate. Exclusion-list
/// entries are removed from the candidate universe first, and each entry
/// is reported through the diagnostics sink whether it was present or
/// not — exclusions are audit-able, never silent.
pub fn match_exports(
    decls: &[FunctionDecl],
    exported: &IndexSet<String>,
    excluded: &[String],
    diags: &mut Diagnostics,
) -> MatchResult {
    let mut candidates: IndexSet<&str> = exported.iter().map(String::as_str).collect();
    for name in excluded {
        if candidates.shift_remove(name.as_str()) {
            diags.info(format!("{} excluded from the compilation", name));
        } else {
            diags.warn(format!(
                "{} was not found/excluded from the compilation",
                name
            ));
        }
    }

    let matched: Vec<FunctionDecl> = decls
        .iter()
        .filter(|d| candidates.contains(d.name.as_str()))
        .cloned()
        .collect();

    let matched_names: HashSet<&str> = matched.iter().map(|d| d.name.as_str()).collect();
    let unmatched: Vec<String> = candidates
        .iter()
        .filter(|name| !matched_names.contains(*name))
        .map(|name| name.to_string())
        .collect();

    MatchResult { matched, unmatched }
}
