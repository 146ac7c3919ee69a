//! Configuration management for placematch.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional config file (TOML, YAML or JSON), and environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "placematch.db";

/// Default subdirectory for diagnostic CSVs.
const OUTPUT_SUBDIR: &str = "output";

/// Config file basenames, checked in order.
const CONFIG_BASENAMES: [&str; 2] = ["placematch", "config"];

/// Config file extensions, checked in order.
const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

pub const ENV_DATA_DIR: &str = "PLACEMATCH_DATA_DIR";
pub const ENV_OUTPUT_DIR: &str = "PLACEMATCH_OUTPUT_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename, relative to `data_dir`.
    pub database_filename: String,
    /// Directory for diagnostic CSV exports.
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        // ~/Documents/placematch, falling back to home, then CWD
        let data_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("placematch");

        Self {
            output_dir: data_dir.join(OUTPUT_SUBDIR),
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            output_dir: data_dir.join(OUTPUT_SUBDIR),
            data_dir,
            ..Default::default()
        }
    }

    /// Full path to the SQLite database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }

    /// Ensure the data and output directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for (dir, label) in [(&self.data_dir, "data"), (&self.output_dir, "output")] {
            std::fs::create_dir_all(dir).map_err(|e| {
                std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create {} directory '{}': {}",
                        label,
                        dir.display(),
                        e
                    ),
                )
            })?;
        }
        Ok(())
    }

    /// Apply `PLACEMATCH_DATA_DIR` / `PLACEMATCH_OUTPUT_DIR`.
    pub fn apply_env_overrides(&mut self) {
        if let Some(dir) = env_path(ENV_DATA_DIR) {
            let follows_data_dir = self.output_dir == self.data_dir.join(OUTPUT_SUBDIR);
            self.data_dir = dir;
            if follows_data_dir {
                self.output_dir = self.data_dir.join(OUTPUT_SUBDIR);
            }
        }
        if let Some(dir) = env_path(ENV_OUTPUT_DIR) {
            self.output_dir = dir;
        }
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| PathBuf::from(shellexpand::tilde(&s).as_ref()))
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (relative paths resolve against the config file).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Database filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Diagnostic output directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    /// Where this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file; format follows the extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| parse_err("TOML", e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_err("YAML", e.to_string()))?
            }
            _ => serde_json::from_str(&contents).map_err(|e| parse_err("JSON", e.to_string()))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// The config file's directory, if loaded from a file.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Expand `~` and resolve relative paths against `base_dir`.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
            settings.output_dir = settings.data_dir.join(OUTPUT_SUBDIR);
        }
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
        if let Some(ref output_dir) = self.output_dir {
            settings.output_dir = self.resolve_path(output_dir, base_dir);
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides discovery).
    pub config_path: Option<PathBuf>,
    /// Resolve relative config paths from CWD instead of the config file's directory.
    pub use_cwd: bool,
    /// Data directory override (`--data`).
    pub data: Option<PathBuf>,
}

/// Look for `placematch.*` or `config.*` in a directory.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    for basename in CONFIG_BASENAMES {
        for ext in CONFIG_EXTENSIONS {
            let path = dir.join(format!("{}.{}", basename, ext));
            if path.is_file() {
                return Some(path);
            }
        }
    }
    None
}

/// Resolve settings from defaults, config file, environment and CLI flags.
pub async fn load_settings_with_options(
    options: &LoadOptions,
) -> Result<(Settings, Config), ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut settings = match options.data {
        Some(ref data) => Settings::with_data_dir(absolute(data, &cwd)),
        None => Settings::default(),
    };

    // --config, then CWD, then the data directory
    let config_path = options
        .config_path
        .clone()
        .or_else(|| find_config_file(&cwd))
        .or_else(|| find_config_file(&settings.data_dir));

    let config = match config_path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            Config::load_from_path(&path).await?
        }
        None => Config::default(),
    };

    let base_dir = if options.use_cwd {
        cwd.clone()
    } else {
        config.base_dir().unwrap_or_else(|| cwd.clone())
    };
    config.apply_to_settings(&mut settings, &base_dir);
    settings.apply_env_overrides();

    // An explicit --data always wins
    if let Some(ref data) = options.data {
        let data_dir = absolute(data, &cwd);
        if settings.output_dir == settings.data_dir.join(OUTPUT_SUBDIR) {
            settings.output_dir = data_dir.join(OUTPUT_SUBDIR);
        }
        settings.data_dir = data_dir;
    }

    Ok((settings, config))
}

fn absolute(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_with_data_dir() {
        let settings = Settings::with_data_dir(PathBuf::from("/srv/placematch"));
        assert_eq!(
            settings.database_path(),
            PathBuf::from("/srv/placematch/placematch.db")
        );
        assert_eq!(settings.output_dir, PathBuf::from("/srv/placematch/output"));
    }

    #[test]
    fn test_find_config_file_prefers_placematch_toml() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_file(dir.path()).is_none());

        fs::write(dir.path().join("config.json"), "{}").unwrap();
        fs::write(dir.path().join("placematch.yaml"), "").unwrap();
        assert_eq!(
            find_config_file(dir.path()),
            Some(dir.path().join("placematch.yaml"))
        );

        fs::write(dir.path().join("placematch.toml"), "").unwrap();
        assert_eq!(
            find_config_file(dir.path()),
            Some(dir.path().join("placematch.toml"))
        );
    }

    #[tokio::test]
    async fn test_load_toml_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("placematch.toml");
        fs::write(
            &path,
            "data_dir = \"data\"\ndatabase = \"socialtoolkit.db\"\noutput_dir = \"/tmp/pm-out\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.base_dir(), Some(dir.path().to_path_buf()));

        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, dir.path());
        assert_eq!(settings.data_dir, dir.path().join("data"));
        assert_eq!(
            settings.database_path(),
            dir.path().join("data").join("socialtoolkit.db")
        );
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/pm-out"));
    }

    #[tokio::test]
    async fn test_load_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("placematch.yml");
        fs::write(&yaml, "database: places.db\n").unwrap();
        let config = Config::load_from_path(&yaml).await.unwrap();
        assert_eq!(config.database.as_deref(), Some("places.db"));

        let json = dir.path().join("config.json");
        fs::write(&json, r#"{"output_dir": "out"}"#).unwrap();
        let config = Config::load_from_path(&json).await.unwrap();
        assert_eq!(config.output_dir.as_deref(), Some("out"));
    }

    #[tokio::test]
    async fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("placematch.toml");
        fs::write(&path, "data_dir = [").unwrap();

        let err = Config::load_from_path(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));
    }

    #[tokio::test]
    async fn test_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "database = \"custom.db\"\n").unwrap();

        let options = LoadOptions {
            config_path: Some(path),
            data: Some(dir.path().join("data")),
            ..Default::default()
        };
        let (settings, config) = load_settings_with_options(&options).await.unwrap();

        assert_eq!(config.database.as_deref(), Some("custom.db"));
        assert_eq!(settings.data_dir, dir.path().join("data"));
        assert_eq!(
            settings.database_path(),
            dir.path().join("data").join("custom.db")
        );
    }
}
