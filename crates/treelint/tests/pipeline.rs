//! End-to-end pipeline tests: parse, dispatch, traverse, collect, fix.

use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;
use treelint::{
    recommended_rules, Eqeqeq, Linter, NoDebugger, NoUnsafeFinally, NoVar, PreferConst, RuleBox,
    ScriptLanguage, Severity,
};

fn linter(rules: Vec<RuleBox>) -> Linter {
    Linter::new(Arc::new(ScriptLanguage), rules)
}

#[test]
fn prefer_const_reports_and_fixes_let_binding() {
    let linter = linter(vec![Box::new(PreferConst::new())]);

    let report = linter.check(Path::new("a.tl"), "let x = 1;").unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.message_id, "useConst");
    assert_eq!(diagnostic.rule, "prefer-const");
    assert_eq!(
        diagnostic.message,
        "'x' is never reassigned. Use 'const' instead."
    );
    assert_eq!(report.line_index().line_col(diagnostic.range.start()), (1, 5));

    let fixed = linter.fix(Path::new("a.tl"), "let x = 1;").unwrap();
    assert_eq!(fixed.output, "const x = 1;");
    assert_eq!(fixed.fixed, 1);
    assert!(fixed.diagnostics.is_empty());
    assert!(fixed.converged);
}

#[test]
fn unsafe_finally_reports_without_a_fix() {
    let linter = linter(vec![Box::new(NoUnsafeFinally::new())]);
    let source = "try { foo(); } finally { return 1; }";

    let report = linter.check(Path::new("a.tl"), source).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.message_id, "unsafeUsage");
    assert!(!diagnostic.is_fixable());
    assert_eq!(diagnostic.severity, Severity::Error);

    // Control-flow changes are not auto-fixable: text is unchanged.
    let fixed = linter.fix(Path::new("a.tl"), source).unwrap();
    assert_eq!(fixed.output, source);
    assert_eq!(fixed.fixed, 0);
}

#[test]
fn var_declarations_converge_to_const_across_passes() {
    // Pass 1 rewrites `var` to `let`; pass 2 rewrites `let` to `const`
    // because the binding is never reassigned; pass 3 finds nothing.
    let linter = linter(vec![
        Box::new(NoVar::new()),
        Box::new(PreferConst::new()),
    ]);

    let report = linter.fix(Path::new("a.tl"), "var x = 1; f(x);").unwrap();
    assert_eq!(report.output, "const x = 1; f(x);");
    assert_eq!(report.fixed, 2);
    assert_eq!(report.passes, 3);
    assert!(report.converged);
}

#[test]
fn suggestions_are_never_auto_applied() {
    let linter = linter(vec![Box::new(Eqeqeq::new())]);
    let source = "a == null;";

    let report = linter.fix(Path::new("a.tl"), source).unwrap();
    assert_eq!(report.output, source);
    assert_eq!(report.fixed, 0);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].suggestions.len(), 1);
    assert_eq!(report.diagnostics[0].suggestions[0].message_id, "useStrict");
}

#[test]
fn disable_directives_suppress_matching_rules() {
    let linter = linter(vec![Box::new(NoDebugger::new())]);
    let source = "debugger; // treelint-disable-line no-debugger\ndebugger;\n";

    let report = linter.check(Path::new("a.tl"), source).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.line_index().line_of(report.diagnostics[0].range.start()), 2);
}

#[test]
fn identical_runs_produce_identical_results() {
    let source = "var a = 1; let b = 2; if (a == null) { debugger; }\n";
    let render = || {
        let linter = linter(recommended_rules());
        let report = linter.fix(Path::new("a.tl"), source).unwrap();
        (
            report.output.clone(),
            report
                .diagnostics
                .iter()
                .map(|d| format!("{}:{}:{}", d.code, d.range, d.message))
                .collect::<Vec<_>>(),
        )
    };

    assert_eq!(render(), render());
}

#[test]
fn runner_discovers_config_and_lints_a_project() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("treelint.toml"),
        "preset = \"strict\"\n\n[rules]\nno-unused-vars = \"error\"\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("main.tl"), "let unused = 1;\n").unwrap();
    std::fs::write(dir.path().join("ok.tl"), "const x = 1; f(x);\n").unwrap();

    let result = treelint::run(dir.path(), &treelint::RunOptions::default()).unwrap();
    assert_eq!(result.files_checked, 2);
    assert!(result.activation_errors.is_empty());
    assert!(result.failures.is_empty());

    // `let unused = 1;` trips both prefer-const and no-unused-vars.
    let codes: Vec<_> = result.diagnostics().map(|(_, d)| d.code.as_str()).collect();
    assert_eq!(codes, ["TL001", "TL007"]);
    let severities: Vec<_> = result.diagnostics().map(|(_, d)| d.severity).collect();
    assert_eq!(severities, [Severity::Warning, Severity::Error]);
}

#[test]
fn runner_fix_mode_rewrites_files_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("main.tl");
    std::fs::write(&file, "var x = 1; f(x);\n").unwrap();

    let options = treelint::RunOptions {
        fix: true,
        ..Default::default()
    };
    let result = treelint::run(dir.path(), &options).unwrap();
    assert_eq!(result.problems_fixed(), 2);
    assert!(!result.has_non_converged());
    assert_eq!(
        std::fs::read_to_string(&file).unwrap(),
        "const x = 1; f(x);\n"
    );
}

#[test]
fn file_failures_do_not_abort_other_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.tl"), "let = ;\n").unwrap();
    std::fs::write(dir.path().join("good.tl"), "debugger;\n").unwrap();

    let result = treelint::run(dir.path(), &treelint::RunOptions::default()).unwrap();
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.reports.len(), 1);
    assert_eq!(result.problems_found(), 1);
}
