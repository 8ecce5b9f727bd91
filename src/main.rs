use review_roster_lib::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("[main] Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = review_roster_lib::run(config).await {
        log::error!("[main] Fatal: {}", e);
        std::process::exit(1);
    }
}
