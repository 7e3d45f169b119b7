mod app;
mod config;
mod configure;
mod helpers;
mod local_logger;
mod logger;
mod prelude;
mod report;
mod request_client;
mod run_environment;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let res = crate::app::run().await;
    local_logger::clean_logger();
    log::logger().flush();

    if let Err(err) = res {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
