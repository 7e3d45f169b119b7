mod interfaces;
mod logger;
mod provider;

mod buildkite;
mod github_actions;
mod gitlab_ci;
mod jenkins;
mod local;

use buildkite::BuildkiteProvider;
use github_actions::GitHubActionsProvider;
use gitlab_ci::GitLabCIProvider;
use jenkins::JenkinsProvider;
use local::LocalProvider;
use provider::RunEnvironmentDetector;

pub use interfaces::RunEnvironment;
pub use provider::RunEnvironmentProvider;

/// Detect the CI the uploader runs in, falling back to a local terminal.
///
/// Build metadata is informational, a CI missing some of its variables is still detected.
pub fn get_provider() -> Box<dyn RunEnvironmentProvider> {
    if JenkinsProvider::detect() {
        return Box::new(JenkinsProvider::from_env());
    }

    if GitHubActionsProvider::detect() {
        return Box::new(GitHubActionsProvider::from_env());
    }

    if GitLabCIProvider::detect() {
        return Box::new(GitLabCIProvider::from_env());
    }

    if BuildkiteProvider::detect() {
        return Box::new(BuildkiteProvider::from_env());
    }

    Box::new(LocalProvider::new())
}
