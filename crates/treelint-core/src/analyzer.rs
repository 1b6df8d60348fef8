//! Per-file lint pipeline and the parallel run orchestrator.

use crate::cancel::CancelToken;
use crate::config::{Config, ConfigError};
use crate::context::FileState;
use crate::directives::DisableDirectives;
use crate::dispatch::{build_dispatch_table, ActiveRule};
use crate::fixer;
use crate::rule::RuleBox;
use crate::traversal;
use crate::tree::TreeProvider;
use crate::types::{Diagnostic, LineIndex, Severity, TextRange};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while setting up or driving a run.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error during discovery.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Directory walk error.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No tree provider was configured.
    #[error("no tree provider configured")]
    MissingProvider,
}

/// A rule that could not be activated for this run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationError {
    /// Rule name.
    pub rule: String,
    /// Why activation failed.
    pub message: String,
}

impl std::fmt::Display for ActivationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule '{}' not activated: {}", self.rule, self.message)
    }
}

/// File-scoped failure kinds. None of these abort the run as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FileFailureKind {
    /// The provider could not parse the file.
    Parse {
        /// Parse error message.
        message: String,
        /// Failure position.
        range: TextRange,
    },
    /// The file could not be read or written.
    Io {
        /// IO error message.
        message: String,
    },
    /// The run was cancelled while this file was in flight.
    Cancelled,
}

/// A file that could not be processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    /// The file.
    pub file: PathBuf,
    /// What went wrong.
    pub kind: FileFailureKind,
}

impl std::fmt::Display for FileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            FileFailureKind::Parse { message, .. } => {
                write!(f, "{}: parse error: {message}", self.file.display())
            }
            FileFailureKind::Io { message } => {
                write!(f, "{}: {message}", self.file.display())
            }
            FileFailureKind::Cancelled => write!(f, "{}: cancelled", self.file.display()),
        }
    }
}

/// Outcome of processing one file to completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// The file.
    pub file: PathBuf,
    /// Diagnostics from the final pass, in (offset, code) order.
    pub diagnostics: Vec<Diagnostic>,
    /// The final text version. Equals the input in check mode.
    pub output: String,
    /// Fix-sets applied across all passes.
    pub fixed: usize,
    /// Number of pipeline passes run.
    pub passes: usize,
    /// False if the pass cap was reached while fixable diagnostics remain.
    pub converged: bool,
}

impl FileReport {
    /// Line index over the final text, for rendering positions.
    #[must_use]
    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.output)
    }
}

/// Merged result of a whole run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Per-file reports, sorted by file path.
    pub reports: Vec<FileReport>,
    /// File-scoped failures, sorted by file path.
    pub failures: Vec<FileFailure>,
    /// Rules that could not be activated for this run.
    pub activation_errors: Vec<ActivationError>,
    /// Number of files scheduled.
    pub files_checked: usize,
}

impl LintResult {
    /// Iterates all diagnostics in (file, offset, code) order.
    pub fn diagnostics(&self) -> impl Iterator<Item = (&Path, &Diagnostic)> {
        self.reports
            .iter()
            .flat_map(|r| r.diagnostics.iter().map(move |d| (r.file.as_path(), d)))
    }

    /// Total problems found in final passes.
    #[must_use]
    pub fn problems_found(&self) -> usize {
        self.reports.iter().map(|r| r.diagnostics.len()).sum()
    }

    /// Total fix-sets applied across all files and passes.
    #[must_use]
    pub fn problems_fixed(&self) -> usize {
        self.reports.iter().map(|r| r.fixed).sum()
    }

    /// Problems still carrying a fix that was not applied (overlap-rejected,
    /// cap-deferred, or check mode).
    #[must_use]
    pub fn problems_fixable(&self) -> usize {
        self.diagnostics().filter(|(_, d)| d.is_fixable()).count()
    }

    /// Counts (errors, warnings, infos) across all reports.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for (_, d) in self.diagnostics() {
            match d.severity {
                Severity::Error => counts.0 += 1,
                Severity::Warning => counts.1 += 1,
                Severity::Info => counts.2 += 1,
            }
        }
        counts
    }

    /// Returns true if any error-severity diagnostic or file failure exists.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty()
            || self
                .diagnostics()
                .any(|(_, d)| d.severity == Severity::Error)
    }

    /// Returns true if any warning-or-worse diagnostic exists.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.diagnostics()
            .any(|(_, d)| d.severity >= Severity::Warning)
    }

    /// Returns true if any file failed to converge under the pass cap.
    #[must_use]
    pub fn has_non_converged(&self) -> bool {
        self.reports.iter().any(|r| !r.converged)
    }
}

/// The per-file pipeline: parse, dispatch, traverse, collect, fix.
///
/// A `Linter` is immutable and shareable across worker threads; all per-file
/// mutable state is created inside [`Linter::check`]/[`Linter::fix`] and
/// dropped before they return.
pub struct Linter {
    provider: Arc<dyn TreeProvider>,
    active: Vec<ActiveRule>,
    activation_errors: Vec<ActivationError>,
    max_passes: usize,
    cancel: CancelToken,
}

impl Linter {
    /// Creates a linter over `rules` with their default severities.
    #[must_use]
    pub fn new(provider: Arc<dyn TreeProvider>, rules: Vec<RuleBox>) -> Self {
        let active = rules
            .into_iter()
            .map(|rule| {
                let severity = rule.meta().default_severity;
                ActiveRule { rule, severity }
            })
            .collect();
        Self {
            provider,
            active,
            activation_errors: Vec::new(),
            max_passes: fixer::MAX_FIX_PASSES,
            cancel: CancelToken::new(),
        }
    }

    /// Applies configured rule levels: `off` removes a rule, other levels
    /// override its severity. A malformed entry deactivates the rule and is
    /// recorded as an activation error; other rules proceed.
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        let mut kept = Vec::with_capacity(self.active.len());
        for mut entry in self.active {
            let name = entry.rule.meta().name;
            match config.rule_level(name) {
                Ok(Some(level)) => match level.severity() {
                    Some(severity) => {
                        entry.severity = severity;
                        kept.push(entry);
                    }
                    None => debug!(rule = name, "rule disabled by config"),
                },
                Ok(None) => kept.push(entry),
                Err(e) => {
                    warn!(rule = name, error = %e, "rule deactivated by bad config");
                    self.activation_errors.push(ActivationError {
                        rule: name.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        self.active = kept;
        if let Some(cap) = config.analyzer.max_fix_passes {
            self.max_passes = cap.max(1);
        }
        self
    }

    /// Records an activation error from an earlier configuration stage
    /// (e.g. option decoding in a rule registry).
    pub fn push_activation_error(&mut self, error: ActivationError) {
        self.activation_errors.push(error);
    }

    /// Overrides the autofix pass cap.
    #[must_use]
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Installs a cancellation token.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Number of active rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.active.len()
    }

    /// Activation errors recorded so far.
    #[must_use]
    pub fn activation_errors(&self) -> &[ActivationError] {
        &self.activation_errors
    }

    /// Runs one parse-dispatch-traverse-collect pass over `text`.
    fn run_pass(&self, path: &Path, text: &str) -> Result<Vec<Diagnostic>, FileFailure> {
        if self.cancel.is_cancelled() {
            return Err(FileFailure {
                file: path.to_path_buf(),
                kind: FileFailureKind::Cancelled,
            });
        }

        let outcome = self.provider.parse(text).map_err(|e| FileFailure {
            file: path.to_path_buf(),
            kind: FileFailureKind::Parse {
                message: e.message,
                range: e.range,
            },
        })?;

        let state = FileState::new(path, Arc::from(text), outcome.types);
        let mut table = build_dispatch_table(&self.active, &state);
        traversal::traverse(&outcome.tree, &mut table, &self.active, &state, &self.cancel)
            .map_err(|_cancelled| FileFailure {
                file: path.to_path_buf(),
                kind: FileFailureKind::Cancelled,
            })?;

        let mut diagnostics = state.take_diagnostics();

        let directives = DisableDirectives::scan(text);
        if !directives.is_empty() {
            let index = LineIndex::new(text);
            diagnostics
                .retain(|d| !directives.is_suppressed(index.line_of(d.range.start()), &d.rule));
        }

        Ok(diagnostics)
    }

    /// Lints `text` without applying fixes (check mode). The report's output
    /// equals the input text.
    ///
    /// # Errors
    ///
    /// Returns a file-scoped failure on parse errors or cancellation.
    pub fn check(&self, path: &Path, text: &str) -> Result<FileReport, FileFailure> {
        let mut diagnostics = self.run_pass(path, text)?;
        sort_for_report(&mut diagnostics);
        Ok(FileReport {
            file: path.to_path_buf(),
            diagnostics,
            output: text.to_string(),
            fixed: 0,
            passes: 1,
            converged: true,
        })
    }

    /// Lints `text` and applies fixes until a fixed point or the pass cap.
    ///
    /// Each pass re-parses the current text, rebuilds the dispatch table,
    /// retraverses and recollects; fixes are never carried over stale. The
    /// reported diagnostics are those of the final pass, expressed against
    /// the final text.
    ///
    /// # Errors
    ///
    /// Returns a file-scoped failure on parse errors or cancellation. The
    /// text is never left half-rewritten: either a complete rewrite is
    /// returned or nothing is.
    pub fn fix(&self, path: &Path, text: &str) -> Result<FileReport, FileFailure> {
        let mut current = text.to_string();
        let mut fixed = 0;
        let mut passes = 0;

        loop {
            passes += 1;
            let diagnostics = self.run_pass(path, &current)?;
            let pass = fixer::run_fix_pass(&current, &diagnostics);

            if pass.applied == 0 {
                let mut diagnostics = diagnostics;
                sort_for_report(&mut diagnostics);
                return Ok(FileReport {
                    file: path.to_path_buf(),
                    diagnostics,
                    output: current,
                    fixed,
                    passes,
                    converged: true,
                });
            }

            fixed += pass.applied;
            current = pass.text;

            if passes >= self.max_passes {
                // Cap reached while fixes were still being applied: run one
                // final collect pass so remaining diagnostics are expressed
                // against the final text.
                let mut diagnostics = self.run_pass(path, &current)?;
                let converged = !fixer::has_applicable(current.len(), &diagnostics);
                if !converged {
                    warn!(
                        file = %path.display(),
                        passes,
                        "fix did not converge within the pass cap"
                    );
                }
                sort_for_report(&mut diagnostics);
                return Ok(FileReport {
                    file: path.to_path_buf(),
                    diagnostics,
                    output: current,
                    fixed,
                    passes: passes + 1,
                    converged,
                });
            }
        }
    }
}

fn sort_for_report(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.range
            .start()
            .cmp(&b.range.start())
            .then_with(|| a.range.end().cmp(&b.range.end()))
            .then_with(|| a.code.cmp(&b.code))
    });
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    provider: Option<Arc<dyn TreeProvider>>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Option<Config>,
    fix: bool,
    cancel: CancelToken,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the tree provider.
    #[must_use]
    pub fn provider(mut self, provider: impl TreeProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Sets a shared tree provider.
    #[must_use]
    pub fn provider_arc(mut self, provider: Arc<dyn TreeProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: crate::rule::Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an include glob pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Enables fix mode: applied fixes are written back to disk.
    #[must_use]
    pub fn fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }

    /// Installs a cancellation token shared by all workers.
    #[must_use]
    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider was configured or the root cannot be
    /// resolved.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let provider = self.provider.ok_or(AnalyzerError::MissingProvider)?;
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.clone());

        let linter = Linter::new(Arc::clone(&provider), self.rules)
            .with_config(&config)
            .with_cancel_token(self.cancel);

        Ok(Analyzer {
            root,
            provider,
            linter,
            exclude_patterns,
            include_patterns: self.include_patterns,
            config,
            fix: self.fix,
        })
    }
}

/// Orchestrates a run: discovers files, fans them out over a bounded worker
/// pool, runs the per-file pipeline on each, and merges the results.
///
/// Files are processed independently; no mutable state is shared between
/// workers, and the merge step is the only synchronization point.
pub struct Analyzer {
    root: PathBuf,
    provider: Arc<dyn TreeProvider>,
    linter: Linter,
    exclude_patterns: Vec<String>,
    #[allow(dead_code)] // Reserved for include pattern support
    include_patterns: Vec<String>,
    config: Config,
    fix: bool,
}

impl Analyzer {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// The root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of active rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.linter.rule_count()
    }

    /// The per-file pipeline, for callers that bring their own text.
    #[must_use]
    pub fn linter(&self) -> &Linter {
        &self.linter
    }

    /// Discovers files under the root and processes them all.
    ///
    /// # Errors
    ///
    /// Returns an error only for discovery problems; per-file failures are
    /// recorded in the result and never abort the run.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);
        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());
        Ok(self.analyze_files(&files))
    }

    /// Processes an explicit file list in parallel and merges the results.
    #[must_use]
    pub fn analyze_files(&self, files: &[PathBuf]) -> LintResult {
        let jobs = self
            .config
            .analyzer
            .parallelism
            .unwrap_or_else(num_cpus::get)
            .max(1);

        let outcomes: Vec<Result<FileReport, FileFailure>> =
            match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => {
                    pool.install(|| files.par_iter().map(|f| self.process_file(f)).collect())
                }
                Err(e) => {
                    warn!(error = %e, "failed to build worker pool, falling back to sequential");
                    files.iter().map(|f| self.process_file(f)).collect()
                }
            };

        let mut result = LintResult {
            files_checked: files.len(),
            activation_errors: self.linter.activation_errors().to_vec(),
            ..LintResult::default()
        };
        for outcome in outcomes {
            match outcome {
                Ok(report) => result.reports.push(report),
                Err(failure) => result.failures.push(failure),
            }
        }
        result.reports.sort_by(|a, b| a.file.cmp(&b.file));
        result.failures.sort_by(|a, b| a.file.cmp(&b.file));

        info!(
            "Analysis complete: {} problems in {} files ({} fixed)",
            result.problems_found(),
            result.files_checked,
            result.problems_fixed()
        );
        result
    }

    /// Runs the full pipeline on one file, writing back fixed text in fix
    /// mode.
    fn process_file(&self, path: &Path) -> Result<FileReport, FileFailure> {
        debug!("Processing: {}", path.display());

        let text = std::fs::read_to_string(path).map_err(|e| FileFailure {
            file: path.to_path_buf(),
            kind: FileFailureKind::Io {
                message: e.to_string(),
            },
        })?;

        if self.fix {
            let report = self.linter.fix(path, &text)?;
            if report.fixed > 0 && report.output != text {
                std::fs::write(path, &report.output).map_err(|e| FileFailure {
                    file: path.to_path_buf(),
                    kind: FileFailureKind::Io {
                        message: e.to_string(),
                    },
                })?;
            }
            Ok(report)
        } else {
            self.linter.check(path, &text)
        }
    }

    /// Discovers all files the provider handles under the root.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut files = if self.config.analyzer.respect_gitignore {
            self.discover_with_gitignore()?
        } else {
            self.discover_with_glob()?
        };
        files.sort();
        Ok(files)
    }

    /// Gitignore-aware walk of the root.
    fn discover_with_gitignore(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let extensions = self.provider.extensions();
        let mut files = Vec::new();
        for entry in ignore::WalkBuilder::new(&self.root).build() {
            let entry = entry?;
            if !entry.file_type().map_or(false, |t| t.is_file()) {
                continue;
            }
            let path = entry.into_path();
            let handled = path
                .extension()
                .and_then(|e| e.to_str())
                .map_or(false, |e| extensions.contains(&e));
            if !handled {
                continue;
            }
            if self.should_exclude(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path);
        }
        Ok(files)
    }

    /// Plain glob walk, used when gitignore handling is turned off.
    fn discover_with_glob(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut files = Vec::new();
        for ext in self.provider.extensions() {
            let pattern = format!("{}/**/*.{ext}", self.root.display());
            for entry in glob::glob(&pattern)? {
                let path = entry.map_err(|e| AnalyzerError::Io(e.into_error()))?;
                if self.should_exclude(&path) {
                    debug!("Excluding: {}", path.display());
                    continue;
                }
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Checks if a path matches an exclude pattern.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/target/**".
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}
