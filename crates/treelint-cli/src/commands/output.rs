//! Shared output formatting for lint results.

use anyhow::Result;
use treelint_core::{FileReport, LintResult, Severity};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn print_text(result: &LintResult) {
    for report in &result.reports {
        let index = report.line_index();
        for diagnostic in &report.diagnostics {
            let (line, column) = index.line_col(diagnostic.range.start());
            println!(
                "{} {} at {}:{}:{}",
                diagnostic.code,
                diagnostic.rule,
                report.file.display(),
                line,
                column,
            );
            println!(
                "  {}: {}",
                severity_indicator(diagnostic.severity),
                diagnostic.message
            );
            for suggestion in &diagnostic.suggestions {
                println!("  = help: {}", suggestion.message);
            }
            println!();
        }
    }

    for failure in &result.failures {
        println!("\x1b[31merror\x1b[0m: {failure}");
    }
    for error in &result.activation_errors {
        println!("\x1b[33mwarning\x1b[0m: {error}");
    }
    for report in non_converged(result) {
        println!(
            "\x1b[33mwarning\x1b[0m: {}: fix did not converge after {} passes",
            report.file.display(),
            report.passes
        );
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 || !result.failures.is_empty() {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} problem(s) ({} error(s), {} warning(s), {} info(s)) in {} file(s): {} fixed, {} still fixable\x1b[0m",
        summary_color,
        result.problems_found(),
        errors,
        warnings,
        infos,
        result.files_checked,
        result.problems_fixed(),
        result.problems_fixable(),
    );
}

/// One diagnostic with rendered line/column coordinates.
#[derive(serde::Serialize)]
struct JsonDiagnostic<'a> {
    file: &'a std::path::Path,
    line: usize,
    column: usize,
    end_line: usize,
    end_column: usize,
    rule: &'a str,
    code: &'a str,
    message_id: &'a str,
    message: &'a str,
    severity: Severity,
    fixable: bool,
}

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    diagnostics: Vec<JsonDiagnostic<'a>>,
    /// Rewritten text per file, present only when fixes were applied.
    fixed_texts: Vec<JsonFixedText<'a>>,
    failures: &'a [treelint_core::FileFailure],
    activation_errors: &'a [treelint_core::ActivationError],
    summary: JsonSummary,
}

#[derive(serde::Serialize)]
struct JsonFixedText<'a> {
    file: &'a std::path::Path,
    text: &'a str,
    passes: usize,
    converged: bool,
}

#[derive(serde::Serialize)]
struct JsonSummary {
    problems: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
    fixed: usize,
    fixable: usize,
    files_checked: usize,
}

fn print_json(result: &LintResult) -> Result<()> {
    let mut diagnostics = Vec::new();
    for report in &result.reports {
        let index = report.line_index();
        for d in &report.diagnostics {
            let (line, column) = index.line_col(d.range.start());
            let (end_line, end_column) = index.line_col(d.range.end());
            diagnostics.push(JsonDiagnostic {
                file: &report.file,
                line,
                column,
                end_line,
                end_column,
                rule: &d.rule,
                code: &d.code,
                message_id: &d.message_id,
                message: &d.message,
                severity: d.severity,
                fixable: d.is_fixable(),
            });
        }
    }

    let fixed_texts = result
        .reports
        .iter()
        .filter(|r| r.fixed > 0)
        .map(|r| JsonFixedText {
            file: &r.file,
            text: &r.output,
            passes: r.passes,
            converged: r.converged,
        })
        .collect();

    let (errors, warnings, infos) = result.count_by_severity();
    let view = JsonReport {
        diagnostics,
        fixed_texts,
        failures: &result.failures,
        activation_errors: &result.activation_errors,
        summary: JsonSummary {
            problems: result.problems_found(),
            errors,
            warnings,
            infos,
            fixed: result.problems_fixed(),
            fixable: result.problems_fixable(),
            files_checked: result.files_checked,
        },
    };

    let json = serde_json::to_string_pretty(&view)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for report in &result.reports {
        let index = report.line_index();
        for diagnostic in &report.diagnostics {
            let (line, column) = index.line_col(diagnostic.range.start());
            println!(
                "{}:{}:{}: {} [{}] {}",
                report.file.display(),
                line,
                column,
                diagnostic.severity,
                diagnostic.code,
                diagnostic.message,
            );
        }
    }
    for failure in &result.failures {
        println!("{failure}");
    }
}

fn non_converged(result: &LintResult) -> impl Iterator<Item = &FileReport> {
    result.reports.iter().filter(|r| !r.converged)
}
