use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vectorforge_path::ParseOptions;
use vectorforge_render::{ReconcileOptions, DEFAULT_BACKGROUND_ID, DEFAULT_ROOT_CONTAINER_ID};

pub const DEFAULT_CONFIG_NAME: &str = "vectorforge.config.json";

/// VectorForge configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Element whose children mirror the layer list
    #[serde(default = "default_root_container_id")]
    pub root_container_id: String,

    #[serde(default = "default_background_id")]
    pub background_id: String,

    /// Extra ids that survive every export
    #[serde(default)]
    pub protected_ids: Vec<String>,

    /// Repeat a command for extra coordinate groups
    #[serde(default)]
    pub implicit_repeat: bool,

    /// Elevate quadratics with distinct control points
    #[serde(default)]
    pub exact_quadratic: bool,

    /// Decimal places for written numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,
}

fn default_root_container_id() -> String {
    DEFAULT_ROOT_CONTAINER_ID.to_string()
}

fn default_background_id() -> String {
    DEFAULT_BACKGROUND_ID.to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            implicit_repeat: self.implicit_repeat,
            exact_quadratic: self.exact_quadratic,
        }
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            root_container_id: self.root_container_id.clone(),
            background_id: self.background_id.clone(),
            extra_protected_ids: self.protected_ids.clone(),
            parse_options: self.parse_options(),
            precision: self.precision,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_container_id: default_root_container_id(),
            background_id: default_background_id(),
            protected_ids: vec![],
            implicit_repeat: false,
            exact_quadratic: false,
            precision: None,
        }
    }
}
