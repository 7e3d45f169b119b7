mod logger;
mod provider;

pub use provider::GitLabCIProvider;
