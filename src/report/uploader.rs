use console::style;
use log::{debug, info};
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use url::Url;

use super::errors::UploadError;
use super::submission::ReportSubmission;
use crate::request_client::REQUEST_CLIENT;

const REPORT_API_PATH: &str = "api/v1/report";

/// Build the ingestion endpoint for a report type.
///
/// The report type is not checked against the types the API knows about, an unknown one
/// simply yields a URL the API will answer with a 404.
pub fn report_url(api_url: &str, report_type: &str) -> Result<Url, UploadError> {
    let raw_url = format!(
        "{}/{REPORT_API_PATH}/{report_type}/store",
        api_url.trim_end_matches('/')
    );
    Url::parse(&raw_url).map_err(|source| UploadError::InvalidEndpoint {
        url: raw_url,
        source,
    })
}

/// What the report API answered, whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResponse {
    pub status: StatusCode,
    pub body: String,
}

impl UploadResponse {
    /// Lines written to the build log once the exchange completes.
    pub fn log_lines(&self) -> [String; 2] {
        [
            format!("response statusCode = {}", self.status.as_u16()),
            format!("response body = {}", self.body),
        ]
    }
}

/// Post the report and log the answer of the API.
///
/// Only file and transport failures are errors. A response with an error status is logged like
/// any other and returned to the caller.
pub async fn submit(
    submission: &ReportSubmission,
    api_url: &str,
) -> Result<UploadResponse, UploadError> {
    post_report(&REQUEST_CLIENT, submission, api_url).await
}

async fn post_report(
    client: &Client,
    submission: &ReportSubmission,
    api_url: &str,
) -> Result<UploadResponse, UploadError> {
    info!("Performing post report, {}!", submission.report_name);

    let url = report_url(api_url, &submission.report_type)?;
    let body = submission.to_form().encode()?;
    debug!(
        "Posting {} bytes to {url} (boundary: {})",
        body.as_bytes().len(),
        body.boundary()
    );

    let response = client
        .post(url)
        .header(CONTENT_TYPE, body.content_type())
        .body(body.into_bytes())
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    let response = UploadResponse { status, body };

    for line in response.log_lines() {
        info!("{line}");
    }
    if !status.is_success() {
        debug!(
            "{}",
            style(format!("The report API answered with {status}")).yellow()
        );
    }

    Ok(response)
}
