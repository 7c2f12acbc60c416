//! Career Platform Backend - Main Entry Point
//!
//! Starts the web API server.

use career_platform::{run_server, AppConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    run_server(config).await
}
