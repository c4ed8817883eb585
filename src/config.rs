use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TestDocError};
use crate::markers::{TestMarkers, DEFAULT_MARKERS};

/// Default directory name for testdoc project data.
const TESTDOC_DIR: &str = ".testdoc";
/// Config filename.
const CONFIG_FILE: &str = "config.toml";

/// Project-level configuration resolved from the working directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the project; also the default filesystem scan root.
    pub project_root: PathBuf,
    /// Path to the `.testdoc/` directory.
    pub testdoc_dir: PathBuf,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// User settings loaded from config.toml.
    pub settings: UserSettings,
}

/// User-configurable settings from .testdoc/config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Test discovery configuration.
    pub discovery: DiscoverySettings,
    /// Filesystem scan configuration.
    pub scan: ScanSettings,
    /// Source parsing configuration.
    pub parse: ParseSettings,
}

/// Discovery-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Fully-qualified annotation names that mark a method as a test.
    pub markers: Vec<String>,
    /// Classpath directories, relative to the project root.
    pub classpath: Vec<String>,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            markers: DEFAULT_MARKERS.iter().map(|m| (*m).to_string()).collect(),
            classpath: vec![
                "target/classes".into(),
                "target/test-classes".into(),
                "build/classes/java/main".into(),
                "build/classes/java/test".into(),
                "out".into(),
            ],
        }
    }
}

/// Settings for the recursive source scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Directory names never descended into.
    pub exclude_dirs: Vec<String>,
    /// Whether .gitignore rules hide files from the scan.
    pub respect_gitignore: bool,
    /// Maximum file size in MB (larger files are ignored).
    pub max_file_size_mb: u32,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            exclude_dirs: vec![".git".into()],
            respect_gitignore: false,
            max_file_size_mb: 10,
        }
    }
}

/// Source parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSettings {
    /// Treat syntax errors in a located source file as fatal.
    pub strict: bool,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl Config {
    /// Create config for a given project root.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let testdoc_dir = project_root.join(TESTDOC_DIR);
        let config_path = testdoc_dir.join(CONFIG_FILE);

        // Try to load settings from config.toml
        let settings = Self::load_settings(&config_path).unwrap_or_default();

        Self {
            project_root,
            testdoc_dir,
            config_path,
            settings,
        }
    }

    /// Create config from the current working directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| TestDocError::Config(format!("cannot get cwd: {e}")))?;
        Ok(Self::new(cwd))
    }

    /// Load settings from config.toml if it exists.
    fn load_settings(config_path: &Path) -> Option<UserSettings> {
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(config_path).ok()?;
        match toml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), "ignoring invalid config: {e}");
                None
            }
        }
    }

    /// Save current settings to config.toml.
    pub fn save_settings(&self) -> Result<()> {
        self.ensure_testdoc_dir()?;
        let content = toml::to_string_pretty(&self.settings)
            .map_err(|e| TestDocError::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Ensure the `.testdoc/` directory exists.
    pub fn ensure_testdoc_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.testdoc_dir)?;
        Ok(())
    }

    /// Classpath directories resolved against the project root.
    #[must_use]
    pub fn classpath_roots(&self) -> Vec<PathBuf> {
        self.settings
            .discovery
            .classpath
            .iter()
            .map(|entry| self.project_root.join(entry))
            .collect()
    }

    /// The configured set of test marker annotations.
    #[must_use]
    pub fn markers(&self) -> TestMarkers {
        TestMarkers::new(self.settings.discovery.markers.iter().cloned())
    }
}
