mod errors;
mod multipart;
mod submission;
mod uploader;

use std::path::PathBuf;

use clap::Args;

use crate::config::QaMatrixConfig;
use crate::prelude::*;

use errors::ConfigValidationError;
use submission::ReportSubmission;
use uploader::submit;

/// Fields of the build step. Every one of them is required, a missing or empty value is
/// rejected before anything is read or sent.
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// The token identifying the project on QA Matrix.
    /// Falls back to the token stored in the QA Matrix config file.
    #[arg(long, env = "QA_MATRIX_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// The name under which the report is stored
    #[arg(long, env = "QA_MATRIX_REPORT_NAME")]
    pub report_name: Option<String>,

    /// The identifier of the QA Matrix project
    #[arg(long, env = "QA_MATRIX_PROJECT_ID")]
    pub project_id: Option<String>,

    /// The name of the QA Matrix project
    #[arg(long, env = "QA_MATRIX_PROJECT_NAME")]
    pub project_name: Option<String>,

    /// The version of the application under test
    #[arg(long, env = "QA_MATRIX_APP_VERSION")]
    pub app_version: Option<String>,

    /// The environment the tests ran against, e.g. `staging`
    #[arg(long, env = "QA_MATRIX_ENVIRONMENT")]
    pub environment: Option<String>,

    /// The path of the report file to upload
    #[arg(long, env = "QA_MATRIX_FILE_LOCATION")]
    pub file_location: Option<String>,

    /// The type of the report, selects the ingestion endpoint (e.g. `json`, `junit`)
    #[arg(long = "type", env = "QA_MATRIX_REPORT_TYPE", alias = "report-type")]
    pub report_type: Option<String>,
}

impl ReportArgs {
    /// Build the submission, taking the token from the loaded config when it was not given
    /// on the command line.
    pub fn into_submission(
        self,
        config: &QaMatrixConfig,
    ) -> Result<ReportSubmission, ConfigValidationError> {
        // In the context of the CI, it is likely that a ~ made its way here without being expanded by the shell
        let file_location = self
            .file_location
            .map(|location| PathBuf::from(shellexpand::tilde(&location).as_ref()))
            .unwrap_or_default();

        let submission = ReportSubmission {
            token: self
                .token
                .or_else(|| config.auth.token.clone())
                .unwrap_or_default(),
            report_name: self.report_name.unwrap_or_default(),
            project_id: self.project_id.unwrap_or_default(),
            project_name: self.project_name.unwrap_or_default(),
            app_version: self.app_version.unwrap_or_default(),
            environment: self.environment.unwrap_or_default(),
            file_location,
            report_type: self.report_type.unwrap_or_default(),
        };
        submission.validate()?;

        Ok(submission)
    }
}

/// Validate the build step fields without uploading anything.
pub fn check(args: ReportArgs, config: &QaMatrixConfig) -> Result<()> {
    let submission = args.into_submission(config)?;
    info!(
        "Report configuration is valid: {} ({}) for {} {}",
        submission.report_name,
        submission.report_type,
        submission.project_name,
        submission.app_version
    );
    Ok(())
}

pub async fn run(args: ReportArgs, config: &QaMatrixConfig, api_url: &str) -> Result<()> {
    let submission = args.into_submission(config)?;

    start_opened_group!("Uploading report");
    let response = submit(&submission, api_url).await;
    end_group!();

    let response = response.context("Failed to upload the report")?;
    debug!("Report API answered {}", response.status);

    Ok(())
}

#[cfg(test)]
mod tests {
    use temp_env::with_var;

    use super::*;
    use crate::config::AuthConfig;
    use errors::MISSING_FIELD_MESSAGE;

    fn complete_args() -> ReportArgs {
        ReportArgs {
            token: Some("t".into()),
            report_name: Some("r".into()),
            project_id: Some("1".into()),
            project_name: Some("p".into()),
            app_version: Some("1.0".into()),
            environment: Some("qa".into()),
            file_location: Some("./report.xml".into()),
            report_type: Some("json".into()),
        }
    }

    #[test]
    fn test_into_submission() {
        let submission = complete_args()
            .into_submission(&QaMatrixConfig::default())
            .unwrap();
        assert_eq!(submission, ReportSubmission::test());
    }

    #[test]
    fn test_into_submission_missing_field() {
        let args = ReportArgs {
            app_version: None,
            ..complete_args()
        };

        let err = args
            .into_submission(&QaMatrixConfig::default())
            .unwrap_err();
        assert_eq!(err.field, "AppVersion");
        assert_eq!(err.to_string(), MISSING_FIELD_MESSAGE);
    }

    #[test]
    fn test_into_submission_token_from_config() {
        let config = QaMatrixConfig {
            auth: AuthConfig {
                token: Some("stored-token".into()),
            },
            api_url: None,
        };
        let args = ReportArgs {
            token: None,
            ..complete_args()
        };

        let submission = args.into_submission(&config).unwrap();
        assert_eq!(submission.token, "stored-token");
    }

    #[test]
    fn test_into_submission_cli_token_wins() {
        let config = QaMatrixConfig {
            auth: AuthConfig {
                token: Some("stored-token".into()),
            },
            api_url: None,
        };

        let submission = complete_args().into_submission(&config).unwrap();
        assert_eq!(submission.token, "t");
    }

    #[test]
    fn test_into_submission_expands_tilde() {
        with_var("HOME", Some("/home/builder"), || {
            let args = ReportArgs {
                file_location: Some("~/reports/report.xml".into()),
                ..complete_args()
            };

            let submission = args
                .into_submission(&QaMatrixConfig::default())
                .unwrap();
            assert_eq!(
                submission.file_location,
                PathBuf::from("/home/builder/reports/report.xml")
            );
        });
    }

    #[test]
    fn test_check() {
        assert!(check(complete_args(), &QaMatrixConfig::default()).is_ok());

        let err = check(ReportArgs::default(), &QaMatrixConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELD_MESSAGE);
    }
}
