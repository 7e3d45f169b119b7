use simplelog::SharedLogger;

use crate::helpers::get_optional_env_variable;
use crate::run_environment::{
    interfaces::{BuildMetadata, RunEnvironment},
    provider::{RunEnvironmentDetector, RunEnvironmentProvider},
};

use super::logger::JenkinsLogger;

#[derive(Debug)]
pub struct JenkinsProvider {
    job_name: Option<String>,
    build_number: Option<String>,
    build_url: Option<String>,
}

impl JenkinsProvider {
    /// Read the build metadata. Agents started outside of a job may lack any of these
    /// variables, which only leaves the metadata incomplete.
    pub fn from_env() -> Self {
        Self {
            job_name: get_optional_env_variable("JOB_NAME"),
            build_number: get_optional_env_variable("BUILD_NUMBER"),
            // Only set when the Jenkins URL is configured on the controller
            build_url: get_optional_env_variable("BUILD_URL"),
        }
    }
}

impl RunEnvironmentDetector for JenkinsProvider {
    fn detect() -> bool {
        get_optional_env_variable("JENKINS_URL").is_some()
            || get_optional_env_variable("JENKINS_HOME").is_some()
    }
}

impl RunEnvironmentProvider for JenkinsProvider {
    fn get_logger(&self) -> Box<dyn SharedLogger> {
        Box::new(JenkinsLogger::new())
    }

    fn get_run_environment(&self) -> RunEnvironment {
        RunEnvironment::Jenkins
    }

    fn get_run_environment_name(&self) -> &'static str {
        "Jenkins"
    }

    fn get_build_metadata(&self) -> BuildMetadata {
        BuildMetadata {
            job: self.job_name.clone(),
            build_id: self.build_number.clone(),
            build_url: self.build_url.clone(),
        }
    }
}
