use std::env;

use simplelog::SharedLogger;

use crate::helpers::get_optional_env_variable;
use crate::run_environment::{
    interfaces::{BuildMetadata, RunEnvironment},
    provider::{RunEnvironmentDetector, RunEnvironmentProvider},
};

use super::logger::GithubActionLogger;

#[derive(Debug)]
pub struct GitHubActionsProvider {
    workflow: Option<String>,
    job: Option<String>,
    run_id: Option<String>,
    run_url: Option<String>,
}

impl GitHubActionsProvider {
    pub fn from_env() -> Self {
        let run_id = get_optional_env_variable("GITHUB_RUN_ID");
        let run_url = match (
            get_optional_env_variable("GITHUB_SERVER_URL"),
            get_optional_env_variable("GITHUB_REPOSITORY"),
            &run_id,
        ) {
            (Some(server_url), Some(repository), Some(run_id)) => Some(format!(
                "{}/{repository}/actions/runs/{run_id}",
                server_url.trim_end_matches('/')
            )),
            _ => None,
        };

        Self {
            workflow: get_optional_env_variable("GITHUB_WORKFLOW"),
            job: get_optional_env_variable("GITHUB_JOB"),
            run_id,
            run_url,
        }
    }
}

impl RunEnvironmentDetector for GitHubActionsProvider {
    fn detect() -> bool {
        env::var("GITHUB_ACTIONS") == Ok("true".into())
    }
}

impl RunEnvironmentProvider for GitHubActionsProvider {
    fn get_logger(&self) -> Box<dyn SharedLogger> {
        Box::new(GithubActionLogger::new())
    }

    fn get_run_environment(&self) -> RunEnvironment {
        RunEnvironment::GithubActions
    }

    fn get_run_environment_name(&self) -> &'static str {
        "GitHub Actions"
    }

    fn get_build_metadata(&self) -> BuildMetadata {
        let job = match (&self.workflow, &self.job) {
            (Some(workflow), Some(job)) => Some(format!("{workflow} / {job}")),
            (workflow, job) => workflow.clone().or_else(|| job.clone()),
        };

        BuildMetadata {
            job,
            build_id: self.run_id.clone(),
            build_url: self.run_url.clone(),
        }
    }
}
