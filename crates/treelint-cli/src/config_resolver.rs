//! Configuration file resolution with global fallback.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{project}/treelint.toml` or `.treelint.toml`
//! 3. `~/.treelint/config.toml` (global fallback)
//! 4. No config found → defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Loaded from the global config directory (`~/.treelint/`).
    Global(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config was loaded from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["treelint.toml", ".treelint.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file path.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(project_dir, explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    // 1. Explicit path from --config flag
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    // 2. Project-level config
    for name in PROJECT_CONFIG_NAMES {
        let candidate = project_dir.join(name);
        if candidate.exists() {
            tracing::debug!("Found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    // 3. Global fallback
    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

/// Returns the global config directory path.
///
/// Resolution: `$TREELINT_CONFIG_DIR` > `~/.treelint/`
///
/// The env var override enables testing and custom CI setups.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("TREELINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".treelint"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let source = resolve_inner(
            Path::new("/nonexistent"),
            Some(Path::new("/tmp/custom.toml")),
            None,
        );
        assert_eq!(
            source,
            ConfigSource::Explicit(PathBuf::from("/tmp/custom.toml"))
        );
    }

    #[test]
    fn project_config_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("treelint.toml");
        std::fs::write(&path, "").unwrap();

        let source = resolve_inner(dir.path(), None, None);
        assert_eq!(source, ConfigSource::Project(path));
    }

    #[test]
    fn hidden_project_config_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".treelint.toml");
        std::fs::write(&path, "").unwrap();

        let source = resolve_inner(dir.path(), None, None);
        assert_eq!(source, ConfigSource::Project(path));
    }

    #[test]
    fn global_config_is_the_fallback() {
        let project = tempfile::tempdir().unwrap();
        let global = tempfile::tempdir().unwrap();
        let path = global.path().join(GLOBAL_CONFIG_NAME);
        std::fs::write(&path, "").unwrap();

        let source = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(source, ConfigSource::Global(path));
        assert!(source.is_global());
    }

    #[test]
    fn defaults_when_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = resolve_inner(dir.path(), None, None);
        assert_eq!(source, ConfigSource::Default);
        assert!(source.path().is_none());
    }
}
