use clap::Args;

use crate::{config::QaMatrixConfig, prelude::*};

#[derive(Debug, Args, Default)]
pub struct ConfigureArgs {
    /// The token to store, used by `upload` when `--token` is not given
    #[arg(long)]
    pub token: Option<String>,
}

/// Store the token and API URL in the configuration file of the build agent.
pub fn run(
    args: ConfigureArgs,
    api_url: Option<String>,
    config_name: Option<&str>,
) -> Result<()> {
    if args.token.is_none() && api_url.is_none() {
        bail!("Nothing to configure, pass --token and/or --api-url");
    }

    let mut config = QaMatrixConfig::load_with_override(config_name, args.token.as_deref())?;
    if api_url.is_some() {
        config.api_url = api_url;
    }
    config.persist(config_name)?;
    info!("QA Matrix configuration saved");

    Ok(())
}

#[cfg(test)]
mod tests {
    use temp_env::with_var;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_configure_nothing() {
        let err = run(ConfigureArgs::default(), None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Nothing to configure, pass --token and/or --api-url"
        );
    }

    #[test]
    fn test_configure_keeps_existing_values() {
        let config_home = TempDir::new().unwrap();
        with_var("XDG_CONFIG_HOME", Some(config_home.path()), || {
            run(
                ConfigureArgs {
                    token: Some("agent-token".into()),
                },
                None,
                Some("agent"),
            )
            .unwrap();
            run(
                ConfigureArgs::default(),
                Some("http://localhost:3001".into()),
                Some("agent"),
            )
            .unwrap();

            let config = QaMatrixConfig::load_with_override(Some("agent"), None).unwrap();
            assert_eq!(config.auth.token, Some("agent-token".into()));
            assert_eq!(config.api_url, Some("http://localhost:3001".into()));
        });
    }
}
