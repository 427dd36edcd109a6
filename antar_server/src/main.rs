use antar_server::{config::ServerConfig, server::run_server};
use dotenvy::dotenv;
use log::{error, info};

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let config = ServerConfig::from_env_or_default();
    if !preflight_check(&config) {
        eprintln!("🚀️ Preflight check failed. Exiting. Check the logs for details.");
        return;
    }

    info!("🚀️ Starting server on {}:{}", config.host, config.port);
    match run_server(config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}

fn preflight_check(config: &ServerConfig) -> bool {
    let mut result = true;
    info!("🚦️ Running preflight checks...");
    if config.auth.jwt_secret.is_empty() {
        error!("🚦️ Preflight check FAILED: ANTAR_JWT_SECRET must be set to the shared signing secret before starting.");
        result = false;
    }
    if config.database_url.is_empty() {
        error!("🚦️ ANTAR_DATABASE_URL is not set. Please set it to the URL for the Antar database.");
        return false;
    }
    if result {
        info!("🚦️ Preflight check PASSED.");
    } else {
        error!("🚦️ Preflight check FAILED: Please fix the issues above before starting the server.");
    }
    result
}
