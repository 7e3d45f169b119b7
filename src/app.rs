use crate::{
    config::QaMatrixConfig,
    configure::{self, ConfigureArgs},
    local_logger::QA_MATRIX_U8_COLOR_CODE,
    prelude::*,
    report::{self, ReportArgs},
    run_environment::{self, RunEnvironment},
};
use clap::{
    Parser, Subcommand,
    builder::{Styles, styling},
};
use simplelog::CombinedLogger;

pub const DEFAULT_API_URL: &str = "https://qa-matrix-v2.xapiens.id";

fn create_styles() -> Styles {
    styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(
            styling::Ansi256Color(QA_MATRIX_U8_COLOR_CODE).on_default() | styling::Effects::BOLD,
        )
        .placeholder(styling::AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Upload test reports to QA Matrix from a CI build step",
    styles = create_styles()
)]
pub struct Cli {
    /// The base URL of the QA Matrix API.
    /// Defaults to the `api-url` of the configuration file, then to the public QA Matrix API.
    #[arg(long, env = "QA_MATRIX_API_URL", global = true)]
    pub api_url: Option<String>,

    /// The configuration name to use
    /// If provided, the configuration will be loaded from ~/.config/qa-matrix/{config-name}.yaml
    /// Otherwise, loads from ~/.config/qa-matrix/config.yaml
    #[arg(long, env = "QA_MATRIX_CONFIG_NAME", global = true)]
    pub config_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a report file to QA Matrix and print the answer of the API
    Upload(Box<ReportArgs>),
    /// Check that every report field is set, without uploading anything
    Check(Box<ReportArgs>),
    /// Store the token and API URL in the QA Matrix configuration file
    Configure(ConfigureArgs),
}

fn resolve_api_url(api_url_override: Option<String>, config: &QaMatrixConfig) -> String {
    api_url_override
        .or_else(|| config.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let provider = run_environment::get_provider();
    CombinedLogger::init(vec![provider.get_logger()]).context("Failed to init logger")?;
    debug!(
        "Run environment detected: {}",
        provider.get_run_environment_name()
    );

    let config_name = cli.config_name.as_deref();
    match cli.command {
        Commands::Upload(args) => {
            let config = QaMatrixConfig::load_with_override(config_name, args.token.as_deref())?;
            let api_url = resolve_api_url(cli.api_url, &config);
            if provider.get_run_environment() != RunEnvironment::Local {
                info!(
                    "Uploading from {} build {}",
                    provider.get_run_environment_name(),
                    provider.get_build_metadata()
                );
            }
            report::run(*args, &config, &api_url).await?
        }
        Commands::Check(args) => {
            let config = QaMatrixConfig::load_with_override(config_name, args.token.as_deref())?;
            report::check(*args, &config)?
        }
        Commands::Configure(args) => configure::run(args, cli.api_url, config_name)?,
    }
    Ok(())
}
