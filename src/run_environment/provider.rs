use simplelog::SharedLogger;

use super::interfaces::{BuildMetadata, RunEnvironment};

pub trait RunEnvironmentDetector {
    /// Detects if the uploader is currently executed within this run environment.
    fn detect() -> bool;
}

/// `RunEnvironmentProvider` is a trait that defines the necessary methods
/// for a continuous integration provider.
pub trait RunEnvironmentProvider {
    /// Returns the logger writing to the build log of this environment.
    fn get_logger(&self) -> Box<dyn SharedLogger>;

    /// Returns the run environment of the current provider.
    fn get_run_environment(&self) -> RunEnvironment;

    /// Returns a human readable name of the run environment.
    fn get_run_environment_name(&self) -> &'static str;

    /// Returns the metadata identifying the current build.
    fn get_build_metadata(&self) -> BuildMetadata;
}
