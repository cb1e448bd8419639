use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::key::KeyEvent;
use crate::keymap::{Action, Binding, BindingScope};
use crate::panel::{CONTAINER_LIST, DETAIL, IMAGE_LIST, NETWORK_LIST, PanelId, VOLUME_LIST};

/// Scopes a keybinding section may name besides `global`.
const BINDABLE_PANELS: [&str; 5] = [IMAGE_LIST, CONTAINER_LIST, VOLUME_LIST, NETWORK_LIST, DETAIL];

/// How to reach the container engine
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct DockerConfig {
    /// `unix:///path/to/docker.sock` or `http://host:port`; local defaults when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    120
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct LogConfig {
    /// Log file; the terminal belongs to the UI so nothing goes to stdout
    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub level: Option<LogLevel>,
}

/// Root configuration file structure
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct DockuiConfig {
    #[serde(default)]
    pub docker: DockerConfig,

    #[serde(default)]
    pub log: LogConfig,

    /// scope (`global` or a panel id) -> key string -> action name
    #[serde(default)]
    pub keybindings: BTreeMap<String, BTreeMap<String, String>>,
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    UnknownPanel { scope: String },
    InvalidKey { scope: String, key: String, message: String },
    UnknownAction { scope: String, key: String, action: String },
    NotFound { searched: Vec<PathBuf> },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Yaml(e) => write!(f, "YAML parse error: {}", e),
            Self::UnknownPanel { scope } => {
                write!(f, "keybindings: unknown scope '{}'", scope)
            }
            Self::InvalidKey {
                scope,
                key,
                message,
            } => write!(f, "keybindings.{}: bad key '{}': {}", scope, key, message),
            Self::UnknownAction { scope, key, action } => write!(
                f,
                "keybindings.{}: '{}' bound to unknown action '{}'",
                scope, key, action
            ),
            Self::NotFound { searched } => {
                write!(f, "no config file found, searched: {:?}", searched)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e)
    }
}

impl DockuiConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a string (useful for testing)
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        // an empty file deserializes to unit, not to an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: DockuiConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Search for a config file: `DOCKUI_CONFIG`, then `start_dir` and its
    /// parents, then the user config directory.
    pub fn discover(start_dir: &Path) -> Result<(PathBuf, Self), ConfigError> {
        Self::discover_with(start_dir, std::env::var_os("DOCKUI_CONFIG").map(PathBuf::from))
    }

    /// [`discover`](Self::discover) with the `DOCKUI_CONFIG` value passed in.
    fn discover_with(
        start_dir: &Path,
        override_path: Option<PathBuf>,
    ) -> Result<(PathBuf, Self), ConfigError> {
        let names = ["dockui.yaml", "dockui.yml", ".dockui.yaml"];
        let mut searched = Vec::new();

        if let Some(path) = override_path {
            if path.exists() {
                return Ok((path.clone(), Self::load(&path)?));
            }
            searched.push(path);
        }

        let mut dir = Some(start_dir);
        while let Some(current) = dir {
            for name in &names {
                let path = current.join(name);
                if path.exists() {
                    return Ok((path.clone(), Self::load(&path)?));
                }
                searched.push(path);
            }
            dir = current.parent();
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("dockui").join("config.yaml");
            if path.exists() {
                return Ok((path.clone(), Self::load(&path)?));
            }
            searched.push(path);
        }

        Err(ConfigError::NotFound { searched })
    }

    /// Reject bindings that name unknown scopes, keys or actions.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bindings().map(|_| ())
    }

    /// Configured keybindings, parsed.
    pub fn bindings(&self) -> Result<Vec<Binding>, ConfigError> {
        let mut out = Vec::new();
        for (scope, keys) in &self.keybindings {
            let binding_scope = if scope == "global" {
                BindingScope::Global
            } else if BINDABLE_PANELS.contains(&scope.as_str()) {
                BindingScope::Panel(PanelId::new(scope.as_str()))
            } else {
                return Err(ConfigError::UnknownPanel {
                    scope: scope.clone(),
                });
            };

            for (key, action) in keys {
                let parsed: KeyEvent = key.parse().map_err(|e: crate::key::ParseKeyError| {
                    ConfigError::InvalidKey {
                        scope: scope.clone(),
                        key: key.clone(),
                        message: e.to_string(),
                    }
                })?;
                let action = Action::from_name(action).ok_or_else(|| ConfigError::UnknownAction {
                    scope: scope.clone(),
                    key: key.clone(),
                    action: action.clone(),
                })?;
                out.push(Binding {
                    scope: binding_scope.clone(),
                    key: parsed,
                    action,
                });
            }
        }
        Ok(out)
    }
}
