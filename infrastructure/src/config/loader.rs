//! Configuration file loader with multi-source merging

use super::file_config::{ConfigValidationError, FileConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "agency";
const PROJECT_FILES: [&str; 2] = ["agency.toml", ".agency.toml"];
const ENV_PREFIX: &str = "AGENCY_";

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to load configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {}", join_errors(.0))]
    Invalid(Vec<ConfigValidationError>),
}

fn join_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `AGENCY_`-prefixed environment variables (`AGENCY_AGENCY__PARALLEL=true`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./agency.toml` or `./.agency.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/agency/config.toml`
    /// 5. Default values
    ///
    /// CLI flags are applied on top by the caller.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigLoadError> {
        Self::load_from(
            Self::global_config_path().as_deref(),
            Path::new("."),
            config_path,
        )
    }

    /// Load with explicit locations for the global file and project directory.
    pub fn load_from(
        global: Option<&Path>,
        project_dir: &Path,
        explicit: Option<&Path>,
    ) -> Result<FileConfig, ConfigLoadError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = Self::project_config_in(project_dir) {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = explicit {
            // Unlike discovered files, an explicit path must exist
            if !path.exists() {
                return Err(ConfigLoadError::Figment(Box::new(figment::Error::from(
                    format!("config file not found: {}", path.display()),
                ))));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: FileConfig = figment.extract().map_err(Box::new)?;
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigLoadError::Invalid(errors));
        }
        Ok(config)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/agency/config.toml if set,
    /// otherwise falls back to ~/.config/agency/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./agency.toml or ./.agency.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.agents.is_empty());
        assert!(!config.agency.parallel);
        assert_eq!(config.agency.max_turns, 20);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.ends_with("agency/config.toml"));
    }

    #[test]
    fn test_sources_are_layered() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        fs::write(
            &global,
            "[model]\nname = \"global-model\"\nreasoning_effort = \"low\"\n\n[agency]\nmax_turns = 7\n",
        )
        .unwrap();

        let project_dir = dir.path().join("project");
        fs::create_dir(&project_dir).unwrap();
        fs::write(project_dir.join(".agency.toml"), "[model]\nname = \"project-model\"\n").unwrap();

        let explicit = dir.path().join("explicit.toml");
        fs::write(&explicit, "[agency]\nparallel = true\n").unwrap();

        let config =
            ConfigLoader::load_from(Some(&global), &project_dir, Some(&explicit)).unwrap();

        assert_eq!(config.model.name, "project-model");
        assert_eq!(config.model.reasoning_effort, "low");
        assert_eq!(config.agency.max_turns, 7);
        assert!(config.agency.parallel);
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            ConfigLoader::load_from(Some(&dir.path().join("nope.toml")), dir.path(), None).unwrap();
        assert_eq!(config.model.name, ConfigLoader::load_defaults().model.name);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::load_from(None, dir.path(), Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigLoadError::Figment(_))));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("agency.toml"),
            "[agency]\nbranch_timeout_seconds = 0\n",
        )
        .unwrap();

        match ConfigLoader::load_from(None, dir.path(), None) {
            Err(ConfigLoadError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].to_string().contains("branch_timeout_seconds"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
