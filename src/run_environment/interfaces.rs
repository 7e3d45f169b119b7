use std::fmt;

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunEnvironment {
    Jenkins,
    GithubActions,
    GitlabCi,
    Buildkite,
    Local,
}

/// Identifies the CI build a report is uploaded from.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetadata {
    pub job: Option<String>,
    pub build_id: Option<String>,
    pub build_url: Option<String>,
}

impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.job, &self.build_id) {
            (Some(job), Some(build_id)) => write!(f, "{job} #{build_id}")?,
            (Some(job), None) => write!(f, "{job}")?,
            (None, Some(build_id)) => write!(f, "#{build_id}")?,
            (None, None) => write!(f, "unknown build")?,
        }
        if let Some(build_url) = &self.build_url {
            write!(f, " ({build_url})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_metadata_display() {
        let metadata = BuildMetadata {
            job: Some("nightly-e2e".into()),
            build_id: Some("42".into()),
            build_url: Some("https://ci.example.com/job/nightly-e2e/42/".into()),
        };
        assert_eq!(
            metadata.to_string(),
            "nightly-e2e #42 (https://ci.example.com/job/nightly-e2e/42/)"
        );
        assert_eq!(BuildMetadata::default().to_string(), "unknown build");
        assert_eq!(
            BuildMetadata {
                build_id: Some("7".into()),
                ..Default::default()
            }
            .to_string(),
            "#7"
        );
    }
}
