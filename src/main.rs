// src/main.rs
use actix_web::{App, HttpServer, middleware, web};
use log::{error, info};

use beforeafter::config::AppConfig;
use beforeafter::services::Orchestrator;
use beforeafter::{AppState, configure};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting BeforeAfter service...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let app_state = AppState::new(Orchestrator::from_config(&config));

    info!("Starting HTTP server on {}:{}", config.host, config.port);
    info!("Health check: http://{}:{}/api/health", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
