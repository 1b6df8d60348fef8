//! Test harness for rule authors.
//!
//! [`RuleTester`] runs exactly the production pipeline (parse, dispatch,
//! traverse, collect, fix) over snippet sources and asserts exact equality
//! with the expected outcome: valid snippets must produce zero diagnostics,
//! invalid snippets must produce the expected message ids at the expected
//! positions and, when given, the expected fully-fixed output.

use crate::analyzer::Linter;
use crate::rule::RuleBox;
use crate::tree::TreeProvider;
use crate::types::LineIndex;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

/// An expected diagnostic for an invalid snippet.
#[derive(Debug, Clone)]
pub struct Expected {
    /// Expected message id.
    pub message_id: &'static str,
    /// Expected 1-indexed line.
    pub line: usize,
    /// Expected 1-indexed column.
    pub column: usize,
}

/// An invalid snippet with its expected diagnostics and optional fixed
/// output.
#[derive(Debug, Clone)]
pub struct InvalidCase {
    /// The source text.
    pub source: &'static str,
    /// Expected diagnostics, in report order.
    pub expected: Vec<Expected>,
    /// Expected text after running the fix loop to convergence. `None`
    /// asserts the source is left unchanged.
    pub output: Option<&'static str>,
}

/// Runs one rule through the full pipeline against snippet sources.
pub struct RuleTester {
    linter: Linter,
}

impl RuleTester {
    /// Creates a tester for one rule.
    #[must_use]
    pub fn new(provider: impl TreeProvider + 'static, rule: RuleBox) -> Self {
        Self {
            linter: Linter::new(Arc::new(provider), vec![rule]),
        }
    }

    /// Asserts that every snippet produces zero diagnostics.
    ///
    /// # Panics
    ///
    /// Panics with a formatted report on any diagnostic or pipeline failure.
    pub fn valid(&self, sources: &[&str]) {
        for source in sources {
            let report = match self.linter.check(Path::new("<valid>"), source) {
                Ok(report) => report,
                Err(failure) => panic!("valid snippet failed to process: {failure}\n{source}"),
            };
            if !report.diagnostics.is_empty() {
                let mut message = format!(
                    "expected no diagnostics, got {}:\n",
                    report.diagnostics.len()
                );
                let index = LineIndex::new(source);
                for d in &report.diagnostics {
                    let (line, column) = index.line_col(d.range.start());
                    let _ = writeln!(message, "  {}:{line}:{column} {}", d.message_id, d.message);
                }
                let _ = writeln!(message, "source:\n{source}");
                panic!("{message}");
            }
        }
    }

    /// Asserts that every snippet produces exactly its expected diagnostics
    /// and fixed output.
    ///
    /// # Panics
    ///
    /// Panics with a formatted report on the first mismatch.
    pub fn invalid(&self, cases: &[InvalidCase]) {
        for case in cases {
            self.run_invalid(case);
        }
    }

    fn run_invalid(&self, case: &InvalidCase) {
        let report = match self.linter.check(Path::new("<invalid>"), case.source) {
            Ok(report) => report,
            Err(failure) => panic!("invalid snippet failed to process: {failure}\n{}", case.source),
        };

        let index = LineIndex::new(case.source);
        let actual: Vec<(String, usize, usize)> = report
            .diagnostics
            .iter()
            .map(|d| {
                let (line, column) = index.line_col(d.range.start());
                (d.message_id.clone(), line, column)
            })
            .collect();
        let expected: Vec<(String, usize, usize)> = case
            .expected
            .iter()
            .map(|e| (e.message_id.to_string(), e.line, e.column))
            .collect();

        if actual != expected {
            panic!(
                "diagnostic mismatch\nexpected: {expected:?}\nactual:   {actual:?}\nsource:\n{}",
                case.source
            );
        }

        let fixed = match self.linter.fix(Path::new("<invalid>"), case.source) {
            Ok(report) => report,
            Err(failure) => panic!("fix pipeline failed: {failure}\n{}", case.source),
        };
        match case.output {
            Some(output) => {
                if fixed.output != output {
                    panic!(
                        "fixed output mismatch\nexpected:\n{output}\nactual:\n{}\nsource:\n{}",
                        fixed.output, case.source
                    );
                }
            }
            None => {
                if fixed.output != case.source {
                    panic!(
                        "expected no fixes, but output changed:\n{}\nsource:\n{}",
                        fixed.output, case.source
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RuleContext;
    use crate::rule::{ListenerTable, Rule, RuleMeta};
    use crate::tree::{NodeKind, ParseError, ParseOutcome, TreeBuilder};
    use crate::types::{Fix, Severity, TextRange};

    const PROGRAM: NodeKind = NodeKind("Program");
    const WORD: NodeKind = NodeKind("Word");

    struct WordProvider;
    impl TreeProvider for WordProvider {
        fn extensions(&self) -> &'static [&'static str] {
            &["tl"]
        }
        fn parse(&self, text: &str) -> Result<ParseOutcome, ParseError> {
            let mut b = TreeBuilder::new();
            let root = b.add_node(None, PROGRAM, TextRange::new(0, text.len()));
            let mut offset = 0;
            for word in text.split_whitespace() {
                let start = text[offset..]
                    .find(word)
                    .map(|i| offset + i)
                    .unwrap_or(offset);
                b.add_node(Some(root), WORD, TextRange::new(start, start + word.len()));
                offset = start + word.len();
            }
            Ok(ParseOutcome::new(b.finish()))
        }
    }

    static META: RuleMeta = RuleMeta {
        name: "no-shout",
        code: "T030",
        description: "lowercases shouted words",
        default_severity: Severity::Warning,
        fixable: true,
        messages: &[("shouted", "Unexpected shouting.")],
    };

    struct NoShout;
    impl Rule for NoShout {
        fn meta(&self) -> &'static RuleMeta {
            &META
        }
        fn create(&self, ctx: &RuleContext) -> ListenerTable {
            let mut table = ListenerTable::new();
            let ctx = ctx.clone();
            table.on(WORD, move |node| {
                let word = ctx.node_text(node).to_string();
                if word.chars().all(|c| c.is_ascii_uppercase()) {
                    ctx.report_with_fix(
                        node.range(),
                        "shouted",
                        &[],
                        vec![Fix::replace(node.range(), word.to_ascii_lowercase())],
                    );
                }
            });
            table
        }
    }

    #[test]
    fn valid_and_invalid_snippets_pass() {
        let tester = RuleTester::new(WordProvider, Box::new(NoShout));
        tester.valid(&["quiet words here", ""]);
        tester.invalid(&[InvalidCase {
            source: "ok LOUD ok",
            expected: vec![Expected {
                message_id: "shouted",
                line: 1,
                column: 4,
            }],
            output: Some("ok loud ok"),
        }]);
    }

    #[test]
    #[should_panic(expected = "expected no diagnostics")]
    fn valid_snippet_with_diagnostics_panics() {
        let tester = RuleTester::new(WordProvider, Box::new(NoShout));
        tester.valid(&["LOUD"]);
    }

    #[test]
    #[should_panic(expected = "diagnostic mismatch")]
    fn wrong_expectation_panics() {
        let tester = RuleTester::new(WordProvider, Box::new(NoShout));
        tester.invalid(&[InvalidCase {
            source: "LOUD",
            expected: vec![Expected {
                message_id: "shouted",
                line: 2,
                column: 1,
            }],
            output: None,
        }]);
    }
}
