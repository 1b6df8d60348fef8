//! Autofix engine: greedy selection of non-overlapping fix-sets and text
//! rewriting.
//!
//! Each diagnostic contributes at most one fix-set, treated as a single
//! indivisible edit spanning the union of its component ranges. Sets are
//! sorted by starting offset and selected greedily left-to-right; a set is
//! accepted only if its span does not overlap any previously accepted span
//! (touching at a boundary is allowed). Rejected sets stay reportable as
//! diagnostics and get a fresh chance on the next pass, because fixes are
//! recomputed from a re-parse of the rewritten text rather than carried over.

use crate::types::{Diagnostic, Fix, TextRange};

/// Upper bound on fix passes per file before the engine reports
/// non-convergence. A tunable constant, not a contract.
pub const MAX_FIX_PASSES: usize = 10;

/// One accepted, normalized fix-set.
pub(crate) struct FixSet {
    pub span: TextRange,
    pub edits: Vec<Fix>,
}

/// Result of applying one pass's selected fix-sets.
pub(crate) struct FixPass {
    pub text: String,
    pub applied: usize,
}

/// Normalizes one diagnostic's fix-set: edits sorted by start, pairwise
/// non-overlapping among themselves, and within bounds. A set that cannot be
/// treated as one atomic edit is discarded entirely.
fn normalize(diagnostic: &Diagnostic, text_len: usize) -> Option<FixSet> {
    if diagnostic.fixes.is_empty() {
        return None;
    }
    let mut edits = diagnostic.fixes.clone();
    edits.sort_by_key(|fix| (fix.range.start(), fix.range.end()));

    let mut span = edits[0].range;
    for pair in edits.windows(2) {
        if pair[1].range.start() < pair[0].range.end() {
            tracing::warn!(
                rule = %diagnostic.rule,
                "discarding fix-set with internally overlapping edits"
            );
            return None;
        }
        span = span.cover(pair[1].range);
    }
    if span.end() > text_len {
        tracing::warn!(
            rule = %diagnostic.rule,
            range = %span,
            text_len,
            "discarding fix-set outside the current text"
        );
        return None;
    }
    Some(FixSet { span, edits })
}

/// Selects the maximal-by-greedy-order subset of non-overlapping fix-sets.
///
/// Candidates are sorted by span start; the sort is stable, so two sets
/// starting at the same offset keep their diagnostic collection order, which
/// encodes rule-registration order at each node. That makes selection fully
/// deterministic.
pub(crate) fn select_fix_sets(text_len: usize, diagnostics: &[Diagnostic]) -> Vec<FixSet> {
    let mut candidates: Vec<FixSet> = diagnostics
        .iter()
        .filter_map(|d| normalize(d, text_len))
        .collect();
    candidates.sort_by_key(|set| set.span.start());

    let mut accepted: Vec<FixSet> = Vec::new();
    let mut last_end: Option<usize> = None;
    for set in candidates {
        let clear = last_end.map_or(true, |end| set.span.start() >= end);
        if clear {
            last_end = Some(set.span.end());
            accepted.push(set);
        }
    }
    accepted
}

/// Applies the selected sets in a single forward rebuild of the text.
pub(crate) fn apply_fix_sets(text: &str, sets: &[FixSet]) -> String {
    let mut edits: Vec<&Fix> = sets.iter().flat_map(|set| set.edits.iter()).collect();
    edits.sort_by_key(|fix| fix.range.start());

    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    for edit in edits {
        output.push_str(&text[last..edit.range.start()]);
        output.push_str(&edit.replacement);
        last = edit.range.end();
    }
    output.push_str(&text[last..]);
    output
}

/// Runs one selection-and-rewrite step over the pass's diagnostics.
pub(crate) fn run_fix_pass(text: &str, diagnostics: &[Diagnostic]) -> FixPass {
    let sets = select_fix_sets(text.len(), diagnostics);
    if sets.is_empty() {
        return FixPass {
            text: text.to_string(),
            applied: 0,
        };
    }
    FixPass {
        text: apply_fix_sets(text, &sets),
        applied: sets.len(),
    }
}

/// Returns true if any diagnostic still carries an applicable fix-set.
pub(crate) fn has_applicable(text_len: usize, diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| normalize(d, text_len).is_some())
}
