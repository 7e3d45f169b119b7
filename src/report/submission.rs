use std::path::PathBuf;

use log::debug;

use super::errors::ConfigValidationError;
use super::multipart::Form;

/// Value of the `TestTool` field, identifying this integration to the report API.
pub const TEST_TOOL: &str = "Jenkins";

/// Name of the form field carrying the report file.
pub const REPORT_FILE_FIELD: &str = "Data";

/// Everything needed to post one report, as configured for the build step.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSubmission {
    pub token: String,
    pub report_name: String,
    pub project_id: String,
    pub project_name: String,
    pub app_version: String,
    pub environment: String,
    pub file_location: PathBuf,
    pub report_type: String,
}

impl ReportSubmission {
    /// Check that every field is set, in declaration order.
    ///
    /// The first empty field wins. Whatever the field, the error carries the same message.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let file_location = self.file_location.to_string_lossy();
        let fields = [
            ("Token", self.token.as_str()),
            ("ReportName", self.report_name.as_str()),
            ("ProjectID", self.project_id.as_str()),
            ("ProjectName", self.project_name.as_str()),
            ("AppVersion", self.app_version.as_str()),
            ("Environment", self.environment.as_str()),
            ("FileLocation", &*file_location),
            ("Type", self.report_type.as_str()),
        ];

        match fields.into_iter().find(|(_, value)| value.is_empty()) {
            Some((field, _)) => {
                debug!("Report field {field} is empty");
                Err(ConfigValidationError { field })
            }
            None => Ok(()),
        }
    }

    /// Form sent to the report API, fields in the order the API documents them.
    pub fn to_form(&self) -> Form {
        Form::new()
            .text("Token", &self.token)
            .text("ReportName", &self.report_name)
            .text("ProjectID", &self.project_id)
            .text("ProjectName", &self.project_name)
            .text("AppVersion", &self.app_version)
            .text("Environment", &self.environment)
            .text("TestTool", TEST_TOOL)
            .file(REPORT_FILE_FIELD, &self.file_location)
    }
}

#[cfg(test)]
impl ReportSubmission {
    /// Constructs a fully populated submission for testing purposes
    pub fn test() -> Self {
        Self {
            token: "t".into(),
            report_name: "r".into(),
            project_id: "1".into(),
            project_name: "p".into(),
            app_version: "1.0".into(),
            environment: "qa".into(),
            file_location: "./report.xml".into(),
            report_type: "json".into(),
        }
    }
}
