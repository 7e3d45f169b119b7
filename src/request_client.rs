use lazy_static::lazy_static;
use reqwest::{Client, ClientBuilder};

const USER_AGENT: &str = concat!("qa-matrix-reporter/", env!("CARGO_PKG_VERSION"));

lazy_static! {
    // No retry middleware: a report is posted at most once per build step.
    pub static ref REQUEST_CLIENT: Client = ClientBuilder::new()
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build the HTTP client");
}
