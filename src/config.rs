//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/grouptree/grouptree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `GROUPTREE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_GROUP_TYPE;

/// Unified configuration for grouptree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Group type used when a request names none (default: "group")
    pub default_group_type: String,
    /// Catalog file backing the repository
    pub catalog: Option<PathBuf>,
    /// User names treated as sysadmins
    pub sysadmins: Vec<String>,
    /// Current user, if any
    pub user: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_group_type: DEFAULT_GROUP_TYPE.to_string(),
            catalog: None,
            sysadmins: vec![],
            user: None,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_group_type: Option<String>,
    pub catalog: Option<PathBuf>,
    pub sysadmins: Option<Vec<String>>,
    pub user: Option<String>,
}

/// Get the XDG config directory for grouptree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "grouptree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("grouptree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["alice"], &["bob"])          // → ["alice", "bob"]
    /// merge_array(&["alice", "bob"], &["!bob"])  // → ["alice"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for item in overlay {
            if let Some(negated) = item.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(item.clone());
            }
        }

        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    fn expand_paths(&mut self) {
        if let Some(catalog) = &self.catalog {
            self.catalog = Some(PathBuf::from(expand_env_vars(
                catalog.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Apply global config onto defaults: every specified field replaces.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            default_group_type: global
                .default_group_type
                .clone()
                .unwrap_or_else(|| self.default_group_type.clone()),
            catalog: global.catalog.clone().or_else(|| self.catalog.clone()),
            sysadmins: global
                .sysadmins
                .clone()
                .unwrap_or_else(|| self.sysadmins.clone()),
            user: global.user.clone().or_else(|| self.user.clone()),
        }
    }

    /// Merge an explicit config file: scalars replace, sysadmins union.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            sysadmins: overlay
                .sysadmins
                .as_ref()
                .map(|o| Self::merge_array(&self.sysadmins, o))
                .unwrap_or_else(|| self.sysadmins.clone()),
            ..self.apply_global(&RawSettings {
                sysadmins: None,
                ..overlay.clone()
            })
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Explicit file: UNION with `!name` negation
    /// - Any → Env vars: REPLACE
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply GROUPTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("GROUPTREE")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("sysadmins"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("default_group_type") {
            settings.default_group_type = val;
        }
        if let Ok(val) = config.get_string("catalog") {
            settings.catalog = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get::<Vec<String>>("sysadmins") {
            settings.sysadmins = val;
        }
        if let Ok(val) = config.get_string("user") {
            settings.user = Some(val);
        }

        Ok(settings)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_negated_admin_when_merging_then_removes_it() {
        let merged = Settings::merge_array(
            &["alice".to_string(), "bob".to_string()],
            &["!bob".to_string(), "carol".to_string()],
        );
        assert_eq!(merged, vec!["alice", "carol"]);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let base = Settings {
            catalog: Some(PathBuf::from("/srv/catalog.toml")),
            sysadmins: vec!["alice".into()],
            ..Settings::default()
        };
        let overlay = RawSettings {
            user: Some("bob".into()),
            sysadmins: Some(vec!["bob".into()]),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);
        assert_eq!(merged.catalog, Some(PathBuf::from("/srv/catalog.toml")));
        assert_eq!(merged.user.as_deref(), Some("bob"));
        assert_eq!(merged.sysadmins, vec!["alice", "bob"]);
        assert_eq!(merged.default_group_type, "group");
    }
}
