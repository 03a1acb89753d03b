use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::ProviderDescriptor;
use crate::engine::{ProviderGraph, ProviderRegistry};
use crate::error::LoggingError;

const CONFIG_PATH_ENV: &str = "SWITCHYARD_CONFIG";
const HTTP_PORT_ENV: &str = "HTTP_PORT";
const DEFAULT_HTTP_PORT: u16 = 9600;

#[derive(Debug)]
pub struct Settings {
    /// Provider configuration file
    pub config_path: PathBuf,
    /// HTTP server port (log + health)
    pub http_port: u16,
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), LoggingError> {
        validate_path(&self.config_path)?;
        validate_port(self.http_port)?;
        Ok(())
    }
}

fn validate_path(path: &Path) -> Result<(), LoggingError> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(LoggingError::Configuration(
            "Configuration path cannot be empty".into(),
        ));
    }
    Ok(())
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), LoggingError> {
    if port == 0 {
        return Err(LoggingError::Configuration("Port cannot be 0".into()));
    }
    Ok(())
}

/// Read a value from environment variable, with support for _FILE suffix (Docker Secrets)
fn get_env_or_file(env_name: &str) -> Result<String, LoggingError> {
    let file_env = format!("{env_name}_FILE");
    if let Ok(file_path) = env::var(&file_env) {
        return fs::read_to_string(&file_path)
            .map(|content| content.trim().to_string())
            .map_err(|e| LoggingError::Configuration(format!("Failed to read {file_env}: {e}")));
    }

    env::var(env_name).map_err(|_| {
        LoggingError::Configuration(format!(
            "Missing required environment variable: {env_name} or {file_env}"
        ))
    })
}

pub fn get_configuration() -> Result<Settings, LoggingError> {
    let config_path = PathBuf::from(get_env_or_file(CONFIG_PATH_ENV)?);

    let http_port = match env::var(HTTP_PORT_ENV) {
        Ok(raw) => raw.trim().parse::<u16>().map_err(|e| {
            LoggingError::Configuration(format!("Invalid {HTTP_PORT_ENV} '{raw}': {e}"))
        })?,
        Err(_) => DEFAULT_HTTP_PORT,
    };

    let settings = Settings {
        config_path,
        http_port,
    };
    settings.validate()?;

    Ok(settings)
}

/// The provider section of a configuration document.
///
/// ```json
/// {
///   "defaultProvider": "Composite",
///   "providers": [
///     { "name": "Composite", "type": "composite", "provider1": "File" },
///     { "name": "File", "type": "jsonFile", "path": "/var/log/app.json" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfiguration {
    #[serde(default)]
    pub default_provider: String,
    #[serde(default)]
    pub providers: Vec<ProviderDescriptor>,
}

impl LoggingConfiguration {
    pub fn from_json_str(json: &str) -> Result<Self, LoggingError> {
        serde_json::from_str(json).map_err(|e| {
            LoggingError::Configuration(format!("Malformed logging configuration: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, LoggingError> {
        let json = fs::read_to_string(path).map_err(|e| {
            LoggingError::Configuration(format!(
                "Failed to read logging configuration {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
    }

    /// Build the provider graph with `registry`.
    pub fn build(self, registry: &ProviderRegistry) -> Result<ProviderGraph, LoggingError> {
        registry.build(self.providers, &self.default_provider)
    }
}
