use std::env;

use simplelog::SharedLogger;

use crate::helpers::get_optional_env_variable;
use crate::run_environment::{
    interfaces::{BuildMetadata, RunEnvironment},
    provider::{RunEnvironmentDetector, RunEnvironmentProvider},
};

use super::logger::GitLabCILogger;

#[derive(Debug)]
pub struct GitLabCIProvider {
    job_name: Option<String>,
    job_id: Option<String>,
    job_url: Option<String>,
}

impl GitLabCIProvider {
    pub fn from_env() -> Self {
        Self {
            job_name: get_optional_env_variable("CI_JOB_NAME"),
            job_id: get_optional_env_variable("CI_JOB_ID"),
            job_url: get_optional_env_variable("CI_JOB_URL"),
        }
    }
}

impl RunEnvironmentDetector for GitLabCIProvider {
    fn detect() -> bool {
        env::var("GITLAB_CI") == Ok("true".into())
    }
}

impl RunEnvironmentProvider for GitLabCIProvider {
    fn get_logger(&self) -> Box<dyn SharedLogger> {
        Box::new(GitLabCILogger::new())
    }

    fn get_run_environment(&self) -> RunEnvironment {
        RunEnvironment::GitlabCi
    }

    fn get_run_environment_name(&self) -> &'static str {
        "GitLab CI"
    }

    fn get_build_metadata(&self) -> BuildMetadata {
        BuildMetadata {
            job: self.job_name.clone(),
            build_id: self.job_id.clone(),
            build_url: self.job_url.clone(),
        }
    }
}
