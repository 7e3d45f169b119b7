use std::{env, fs, path::PathBuf};

use crate::prelude::*;
use nestify::nest;
use serde::{Deserialize, Serialize};

nest! {
    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]*
    #[serde(rename_all = "kebab-case", default)]*
    /// Persistent configuration for the QA Matrix CLI.
    ///
    /// Stored at `~/.config/qa-matrix/config.yaml`, it lets a build agent keep the report
    /// token and the API location out of the job definition. Values given on the command line
    /// or through `QA_MATRIX_*` environment variables always take precedence.
    pub struct QaMatrixConfig {
        pub auth: pub struct AuthConfig {
            pub token: Option<String>,
        },
        pub api_url: Option<String>,
    }
}

/// Get the path to the configuration file, following the XDG Base Directory Specification
/// at https://specifications.freedesktop.org/basedir-spec/basedir-spec-latest.html
///
/// If config_name is None, returns ~/.config/qa-matrix/config.yaml (default)
/// If config_name is Some, returns ~/.config/qa-matrix/{config_name}.yaml
fn get_configuration_file_path(config_name: Option<&str>) -> Result<PathBuf> {
    let config_dir = match env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = env::var("HOME").context("HOME env variable not set")?;
            PathBuf::from(home).join(".config")
        }
    };
    let config_dir = config_dir.join("qa-matrix");

    Ok(match config_name {
        Some(name) => config_dir.join(format!("{name}.yaml")),
        None => config_dir.join("config.yaml"),
    })
}

impl QaMatrixConfig {
    /// Load the configuration. If it does not exist, return a default configuration.
    ///
    /// If token_override is provided, the token from the loaded configuration will be
    /// ignored, and the override will be used instead
    pub fn load_with_override(
        config_name: Option<&str>,
        token_override: Option<&str>,
    ) -> Result<Self> {
        let config_path = get_configuration_file_path(config_name)?;

        let mut config = match fs::read(&config_path) {
            Ok(config_str) => {
                let config: QaMatrixConfig =
                    serde_yaml::from_slice(&config_str).context(format!(
                        "Failed to parse QA Matrix config at {}",
                        config_path.display()
                    ))?;
                debug!("Config loaded from {}", config_path.display());
                config
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file not found at {}", config_path.display());
                QaMatrixConfig::default()
            }
            Err(e) => bail!("Failed to load config: {e}"),
        };

        if let Some(token) = token_override {
            config.auth.token = Some(token.to_owned());
        }

        Ok(config)
    }

    /// Persist changes to the configuration
    pub fn persist(&self, config_name: Option<&str>) -> Result<()> {
        let config_path = get_configuration_file_path(config_name)?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_str = serde_yaml::to_string(self)?;
        fs::write(&config_path, config_str)?;
        debug!("Config written to {}", config_path.display());

        Ok(())
    }
}
