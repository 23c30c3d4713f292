//! `rails-tsp.toml` configuration.
//!
//! Every key is optional; missing sections fall back to the defaults below.
//!
//! ```toml
//! [output]
//! path = "rails.tsp"
//! nullable = "union"          # or "optional"
//!
//! [service]
//! title = "Rails API"
//! server = "http://localhost:3000"
//! server_description = "api"
//! route = "/api/v1"
//! namespace = "Api"
//!
//! [schema]
//! paths = ["db/schema.rb", "../backend/db/schema.rb", "../api/db/schema.rb"]
//!
//! [models]
//! patterns = ["app/models/**/*.rb"]
//! exclude = ["**/concerns/**"]
//! enums = true
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TspError, TspResult};

/// Project-local config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "rails-tsp.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output: OutputConfig,
    pub service: ServiceConfig,
    pub schema: SchemaConfig,
    pub models: ModelsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output file, relative to the working directory.
    pub path: PathBuf,
    pub nullable: NullableStyle,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("rails.tsp"),
            nullable: NullableStyle::default(),
        }
    }
}

/// How a nullable column is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullableStyle {
    /// `name: T | null;`
    #[default]
    Union,
    /// `name?: T;`
    Optional,
}

/// Values for the document preamble decorators.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub title: String,
    pub server: String,
    pub server_description: String,
    pub route: String,
    pub namespace: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            title: "Rails API".to_string(),
            server: "http://localhost:3000".to_string(),
            server_description: "api".to_string(),
            route: "/api/v1".to_string(),
            namespace: "Api".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Candidate schema locations relative to the working directory, tried in order.
    pub paths: Vec<PathBuf>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            paths: ["db/schema.rb", "../backend/db/schema.rb", "../api/db/schema.rb"]
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelsConfig {
    /// Glob patterns for model files, relative to the project root.
    pub patterns: Vec<String>,
    pub exclude: Vec<String>,
    /// Scan model files for `enum` declarations.
    pub enums: bool,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                "app/models/**/*.rb".to_string(),
                "backend/app/models/**/*.rb".to_string(),
                "server/app/models/**/*.rb".to_string(),
                "**/app/models/**/*.rb".to_string(),
            ],
            exclude: vec![
                "**/concerns/**".to_string(),
                "**/application_record.rb".to_string(),
            ],
            enums: true,
        }
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> TspResult<Self> {
        toml::from_str(content).map_err(|e| TspError::Config(e.to_string()))
    }

    /// Load from an explicit file.
    pub fn from_file(path: &Path) -> TspResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| TspError::read(path, e))?;
        toml::from_str(&content).map_err(|e| TspError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve the effective config for a working directory.
    ///
    /// Order: `explicit`, then `<cwd>/rails-tsp.toml`, then the user config
    /// directory, then built-in defaults.
    pub fn load(cwd: &Path, explicit: Option<&Path>) -> TspResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(&cwd.join(path));
        }

        let local = cwd.join(CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(&local);
        }

        if let Some(global) = user_config_path()
            && global.is_file()
        {
            return Self::from_file(&global);
        }

        Ok(Self::default())
    }
}

/// `~/.config/rails-tsp/config.toml` (platform dependent).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rails-tsp").join("config.toml"))
}
