//! The combined note body built from handler fragments.

use std::fmt;

/// Ordered concatenation of handler fragments.
///
/// Each accepted fragment is followed by exactly one newline. Fragments that
/// are empty or consist only of whitespace are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedMessage {
    body: String,
    fragments: usize,
}

impl AggregatedMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment, returning whether it contributed any text.
    pub fn push_fragment(&mut self, fragment: &str) -> bool {
        if fragment.trim().is_empty() {
            return false;
        }
        self.body.push_str(fragment);
        self.body.push('\n');
        self.fragments += 1;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Number of fragments that contributed text.
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }

    pub fn into_string(self) -> String {
        self.body
    }
}

impl fmt::Display for AggregatedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}
