//! Registre server - main entry point

use anyhow::Result;
use registre_common::logging::{init_logging, LogConfig};
use tracing::info;

use registre_server::{api, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("registre-server")
        .filter_directives("registre_server=debug,tower_http=debug,sqlx=warn")
        .build();

    // Environment variables take precedence
    let log_config = LogConfig::from_env_with(log_config)?;

    let _guard = init_logging(&log_config)?;

    info!("Starting Registre server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    api::serve(config).await
}
