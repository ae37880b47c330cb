// Fri Jan 23 2026 - Alex

use indexmap::IndexSet;

/// In-memory per-category output-identifier registry. Replaces the legacy
/// probe-the-filesystem-in-a-loop collision handling: one registry is
/// populated during a single emission pass, so the suffixing behavior is
/// deterministic and testable without a filesystem.
#[derive(Debug, Default)]
pub struct NameRegistry {
    claimed: IndexSet<String>,
}

/// Result of claiming an identifier: the final unique name, plus the
/// original when a suffix had to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedName {
    pub name: String,
    pub renamed_from: Option<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `name`, appending the first free numeric suffix (starting
    /// at 1) when the plain name is already taken.
    pub fn claim(&mut self, name: &str) -> ClaimedName {
        if self.claimed.insert(name.to_string()) {
            return ClaimedName {
                name: name.to_string(),
                renamed_from: None,
            };
        }
        let mut suffix = 1usize;
        loop {
            let candidate = format!("{}{}", name, suffix);
            if self.claimed.insert(candidate.clone()) {
                return ClaimedName {
                    name: candidate,
                    renamed_from: Some(name.to_string()),
                };
            }
            suffix += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }
}
