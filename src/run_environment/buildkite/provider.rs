use std::env;

use simplelog::SharedLogger;

use crate::helpers::get_optional_env_variable;
use crate::run_environment::{
    interfaces::{BuildMetadata, RunEnvironment},
    provider::{RunEnvironmentDetector, RunEnvironmentProvider},
};

use super::logger::BuildkiteLogger;

#[derive(Debug)]
pub struct BuildkiteProvider {
    pipeline_slug: Option<String>,
    build_number: Option<String>,
    build_url: Option<String>,
}

impl BuildkiteProvider {
    pub fn from_env() -> Self {
        Self {
            pipeline_slug: get_optional_env_variable("BUILDKITE_PIPELINE_SLUG"),
            build_number: get_optional_env_variable("BUILDKITE_BUILD_NUMBER"),
            build_url: get_optional_env_variable("BUILDKITE_BUILD_URL"),
        }
    }
}

impl RunEnvironmentDetector for BuildkiteProvider {
    fn detect() -> bool {
        env::var("BUILDKITE") == Ok("true".into())
    }
}

impl RunEnvironmentProvider for BuildkiteProvider {
    fn get_logger(&self) -> Box<dyn SharedLogger> {
        Box::new(BuildkiteLogger::new())
    }

    fn get_run_environment(&self) -> RunEnvironment {
        RunEnvironment::Buildkite
    }

    fn get_run_environment_name(&self) -> &'static str {
        "Buildkite"
    }

    fn get_build_metadata(&self) -> BuildMetadata {
        BuildMetadata {
            job: self.pipeline_slug.clone(),
            build_id: self.build_number.clone(),
            build_url: self.build_url.clone(),
        }
    }
}
