use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the course catalog tooling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory every relative catalog path is resolved against
    pub project_root: PathBuf,

    /// Catalog directory layout, relative to the project root
    pub paths: PathsConfig,

    /// Transcript assignment settings
    pub assignment: AssignmentConfig,

    /// Storage adapter settings
    pub store: StoreConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Course documents (`*.json`)
    pub courses_dir: PathBuf,

    /// Registry records, one `{transcript_id}.json` per transcript
    pub registry_dir: PathBuf,

    /// Holding directory for transcripts not bound to a lesson
    pub unassigned_dir: PathBuf,

    /// Default destination of the exported course schema
    pub schema_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    /// Method tag recorded when the caller does not pass one
    pub default_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Cross-invocation isolation. Callers serialize commands themselves.
    pub locking: LockingMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LockingMode {
    /// No file locks and no version tokens
    #[default]
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            courses_dir: PathBuf::from("courses/processed"),
            registry_dir: PathBuf::from("transcripts/registry"),
            unassigned_dir: PathBuf::from("transcripts/processed/unassigned"),
            schema_file: PathBuf::from("docs/ontology_schema.json"),
        }
    }
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            default_method: "manual".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            locking: LockingMode::None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            paths: PathsConfig::default(),
            assignment: AssignmentConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the usual locations, falling back to
    /// defaults overlaid with environment variables
    pub fn load() -> Result<Self> {
        let config_paths = ["course-atlas.toml", "config/course-atlas.toml"];

        for path in &config_paths {
            if Path::new(path).exists() {
                return Self::load_from(Path::new(path));
            }
        }

        Ok(Self::from_env())
    }

    /// Load configuration from an explicit TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let config: Config = toml::from_str(&config_str)
            .map_err(|e| CatalogError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("📄 Loaded configuration from: {}", path.display());
        Ok(config.apply_env())
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    fn apply_env(mut self) -> Self {
        if let Ok(root) = std::env::var("COURSE_ATLAS_ROOT") {
            self.project_root = PathBuf::from(root);
        }

        if let Ok(log_level) = std::env::var("COURSE_ATLAS_LOG_LEVEL") {
            self.logging.log_level = log_level;
        }

        if let Ok(method) = std::env::var("COURSE_ATLAS_ASSIGNMENT_METHOD") {
            self.assignment.default_method = method;
        }

        self
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)
            .map_err(|e| CatalogError::Config(e.to_string()))?;
        std::fs::write(path, config_str).map_err(|e| CatalogError::io(path, e))?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let dirs = [
            ("courses_dir", &self.paths.courses_dir),
            ("registry_dir", &self.paths.registry_dir),
            ("unassigned_dir", &self.paths.unassigned_dir),
        ];

        for (name, dir) in dirs {
            if dir.as_os_str().is_empty() {
                return Err(CatalogError::Config(format!("{} must not be empty", name)));
            }
        }

        if self.paths.registry_dir == self.paths.unassigned_dir {
            return Err(CatalogError::Config(
                "registry_dir and unassigned_dir must differ".to_string(),
            ));
        }

        if self.assignment.default_method.trim().is_empty() {
            return Err(CatalogError::Config(
                "assignment.default_method must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn courses_dir(&self) -> PathBuf {
        self.project_root.join(&self.paths.courses_dir)
    }

    pub fn registry_dir(&self) -> PathBuf {
        self.project_root.join(&self.paths.registry_dir)
    }

    pub fn unassigned_dir(&self) -> PathBuf {
        self.project_root.join(&self.paths.unassigned_dir)
    }

    pub fn schema_file(&self) -> PathBuf {
        self.project_root.join(&self.paths.schema_file)
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Course Atlas Configuration:\n\
            - Project Root: {}\n\
            - Courses: {}\n\
            - Registry: {}\n\
            - Unassigned Transcripts: {}\n\
            - Default Assignment Method: {}\n\
            - Locking: {:?}",
            self.project_root.display(),
            self.paths.courses_dir.display(),
            self.paths.registry_dir.display(),
            self.paths.unassigned_dir.display(),
            self.assignment.default_method,
            self.store.locking
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_project_root(mut self, root: PathBuf) -> Self {
        self.config.project_root = root;
        self
    }

    pub fn with_courses_dir(mut self, dir: PathBuf) -> Self {
        self.config.paths.courses_dir = dir;
        self
    }

    pub fn with_registry_dir(mut self, dir: PathBuf) -> Self {
        self.config.paths.registry_dir = dir;
        self
    }

    pub fn with_unassigned_dir(mut self, dir: PathBuf) -> Self {
        self.config.paths.unassigned_dir = dir;
        self
    }

    pub fn with_default_method(mut self, method: &str) -> Self {
        self.config.assignment.default_method = method.to_string();
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.config.logging.log_level = level.to_string();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
