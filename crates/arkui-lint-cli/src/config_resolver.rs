//! Configuration file discovery.
//!
//! The configuration file is located in this order:
//!
//! 1. `--config` flag or `ARKUI_LINT_CONFIG` (explicit path)
//! 2. `arkui-lint.toml` or `.arkui-lint.toml` in the checked directory or
//!    one of its ancestors, up to the project boundary
//! 3. `~/.arkui-lint/config.toml` (global fallback)
//! 4. No config found → defaults
//!
//! A directory holding `oh-package.json5` or `.git` is a project boundary:
//! it is searched, its parents are not.

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line or through the environment.
    Explicit(PathBuf),
    /// Found in the checked directory or an ancestor inside the project.
    Project(PathBuf),
    /// Loaded from the global config directory (`~/.arkui-lint/`).
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

const PROJECT_CONFIG_NAMES: &[&str] = &["arkui-lint.toml", ".arkui-lint.toml"];

const PROJECT_MARKERS: &[&str] = &["oh-package.json5", ".git"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file for a check of `target`.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(target, explicit, global_config_dir())
}

fn resolve_inner(target: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_project_config(target) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    let global = global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.exists());
    match global {
        Some(candidate) => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        None => ConfigSource::Default,
    }
}

fn find_project_config(target: &Path) -> Option<PathBuf> {
    let target = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(target)
    };
    let start = if target.is_file() {
        target.parent()?
    } else {
        &target
    };

    for dir in start.ancestors() {
        let found = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());
        if found.is_some() {
            return found;
        }
        if PROJECT_MARKERS.iter().any(|m| dir.join(m).exists()) {
            break;
        }
    }
    None
}

/// Returns the global config directory path.
///
/// Resolution: `$ARKUI_LINT_CONFIG_DIR` > `~/.arkui-lint/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("ARKUI_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".arkui-lint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// `<tmp>/app/oh-package.json5` plus `<tmp>/app/entry/src/main/ets`.
    fn harmony_project() -> (TempDir, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let app = tmp.path().join("app");
        let ets = app.join("entry/src/main/ets");
        fs::create_dir_all(&ets).unwrap();
        fs::write(app.join("oh-package.json5"), "{}").unwrap();
        (tmp, app, ets)
    }

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let (_tmp, app, ets) = harmony_project();
        fs::write(app.join("arkui-lint.toml"), "").unwrap();

        let result = resolve_inner(&ets, Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(result, ConfigSource::Explicit(PathBuf::from("/nonexistent.toml")));
    }

    #[test]
    fn config_in_checked_directory() {
        let (_tmp, _app, ets) = harmony_project();
        fs::write(ets.join(".arkui-lint.toml"), "").unwrap();

        let result = resolve_inner(&ets, None, None);
        assert_eq!(result, ConfigSource::Project(ets.join(".arkui-lint.toml")));
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let (_tmp, app, ets) = harmony_project();
        fs::write(app.join("arkui-lint.toml"), "").unwrap();
        fs::write(app.join(".arkui-lint.toml"), "").unwrap();

        let result = resolve_inner(&ets, None, None);
        assert_eq!(result, ConfigSource::Project(app.join("arkui-lint.toml")));
    }

    #[test]
    fn nearest_ancestor_wins() {
        let (_tmp, app, ets) = harmony_project();
        fs::write(app.join("arkui-lint.toml"), "").unwrap();
        fs::write(app.join("entry/arkui-lint.toml"), "").unwrap();

        let result = resolve_inner(&ets, None, None);
        assert_eq!(result, ConfigSource::Project(app.join("entry/arkui-lint.toml")));
    }

    #[test]
    fn file_target_searches_from_its_directory() {
        let (_tmp, app, ets) = harmony_project();
        fs::write(app.join("arkui-lint.toml"), "").unwrap();
        let page = ets.join("Index.ets");
        fs::write(&page, "").unwrap();

        let result = resolve_inner(&page, None, None);
        assert_eq!(result, ConfigSource::Project(app.join("arkui-lint.toml")));
    }

    #[test]
    fn search_stops_at_project_boundary() {
        let (tmp, _app, ets) = harmony_project();
        fs::write(tmp.path().join("arkui-lint.toml"), "").unwrap();

        let result = resolve_inner(&ets, None, None);
        assert_eq!(result, ConfigSource::Default);
    }

    #[test]
    fn global_fallback_when_no_project_config() {
        let (_tmp, _app, ets) = harmony_project();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_inner(&ets, None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Global(global.path().join("config.toml")));
        assert!(result.is_global());
    }

    #[test]
    fn global_dir_without_config_file_returns_default() {
        let (_tmp, _app, ets) = harmony_project();
        let global = TempDir::new().unwrap();

        let result = resolve_inner(&ets, None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
    }
}
