//! Inline disable directives.
//!
//! Source comments can suppress diagnostics on a single line:
//!
//! ```text
//! debugger; // treelint-disable-line no-debugger
//! // treelint-disable-next-line prefer-const, no-var
//! let x = 1;
//! ```
//!
//! A directive without a rule list suppresses every rule on the targeted
//! line. Scanning is purely text-based so it works for any provider language
//! that uses `//` line comments, and it runs as a post-filter over collected
//! diagnostics, after traversal.

use std::collections::{HashMap, HashSet};

const DISABLE_LINE: &str = "treelint-disable-line";
const DISABLE_NEXT_LINE: &str = "treelint-disable-next-line";

/// Per-file table of suppressed (line, rule) pairs.
#[derive(Debug, Default)]
pub struct DisableDirectives {
    /// Line -> suppressed rule names; `None` means all rules.
    by_line: HashMap<usize, Option<HashSet<String>>>,
}

impl DisableDirectives {
    /// Scans `text` for directives.
    #[must_use]
    pub fn scan(text: &str) -> Self {
        let mut by_line: HashMap<usize, Option<HashSet<String>>> = HashMap::new();

        for (i, line) in text.lines().enumerate() {
            let Some(comment_start) = line.find("//") else {
                continue;
            };
            let comment = line[comment_start + 2..].trim();

            // Longest marker first: "-next-line" contains "-line".
            let (marker, target) = if let Some(rest) = comment.strip_prefix(DISABLE_NEXT_LINE) {
                (rest, i + 2)
            } else if let Some(rest) = comment.strip_prefix(DISABLE_LINE) {
                (rest, i + 1)
            } else {
                continue;
            };

            let rules: HashSet<String> = marker
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();

            let entry = by_line.entry(target).or_insert_with(|| Some(HashSet::new()));
            if rules.is_empty() {
                *entry = None;
            } else if let Some(set) = entry {
                set.extend(rules);
            }
        }

        Self { by_line }
    }

    /// Returns true if `rule` is suppressed on the 1-indexed `line`.
    #[must_use]
    pub fn is_suppressed(&self, line: usize, rule: &str) -> bool {
        match self.by_line.get(&line) {
            Some(None) => true,
            Some(Some(rules)) => rules.contains(rule),
            None => false,
        }
    }

    /// Returns true if no directives were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disable_line_targets_its_own_line() {
        let d = DisableDirectives::scan("debugger; // treelint-disable-line no-debugger\n");
        assert!(d.is_suppressed(1, "no-debugger"));
        assert!(!d.is_suppressed(1, "prefer-const"));
        assert!(!d.is_suppressed(2, "no-debugger"));
    }

    #[test]
    fn disable_next_line_targets_the_following_line() {
        let text = "// treelint-disable-next-line prefer-const, no-var\nlet x = 1;\n";
        let d = DisableDirectives::scan(text);
        assert!(d.is_suppressed(2, "prefer-const"));
        assert!(d.is_suppressed(2, "no-var"));
        assert!(!d.is_suppressed(1, "prefer-const"));
    }

    #[test]
    fn bare_directive_suppresses_all_rules() {
        let d = DisableDirectives::scan("debugger; // treelint-disable-line\n");
        assert!(d.is_suppressed(1, "anything"));
    }

    #[test]
    fn plain_comments_are_ignored() {
        let d = DisableDirectives::scan("// just a comment\nlet x = 1; // another\n");
        assert!(d.is_empty());
    }

    #[test]
    fn bare_directive_wins_over_listed_rules() {
        let text = "// treelint-disable-next-line no-var\nx; // treelint-disable-line\n";
        let d = DisableDirectives::scan(text);
        assert!(d.is_suppressed(2, "no-var"));
        assert!(d.is_suppressed(2, "no-debugger"));
    }
}
