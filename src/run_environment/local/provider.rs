use simplelog::SharedLogger;

use crate::local_logger::get_local_logger;
use crate::run_environment::{
    interfaces::{BuildMetadata, RunEnvironment},
    provider::RunEnvironmentProvider,
};

/// Used when no CI is detected, e.g. when the uploader is run by hand.
#[derive(Debug, Default)]
pub struct LocalProvider;

impl LocalProvider {
    pub fn new() -> Self {
        Self
    }
}

impl RunEnvironmentProvider for LocalProvider {
    fn get_logger(&self) -> Box<dyn SharedLogger> {
        get_local_logger()
    }

    fn get_run_environment(&self) -> RunEnvironment {
        RunEnvironment::Local
    }

    fn get_run_environment_name(&self) -> &'static str {
        "Local"
    }

    fn get_build_metadata(&self) -> BuildMetadata {
        BuildMetadata::default()
    }
}
