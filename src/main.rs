use comptoir::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();

    let log_dir = format!("{}/logs", config.work_dir);
    std::fs::create_dir_all(&log_dir)?;
    comptoir::init_logger_with_file(None, Some(log_dir.as_str()));

    print_banner();
    tracing::info!(environment = %config.environment, "Comptoir server starting...");

    let state = ServerState::initialize(&config).await;
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
