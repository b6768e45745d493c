use actix_web::{web, App, HttpServer};
use log::{error, info};
use std::io;
use std::path::Path;

use project_catalog::api::{list_projects, list_projects_preflight};
use project_catalog::app_state::AppState;
use project_catalog::config::{log_config_path, AppConfig};

fn init_logging(config_file: &Path) -> io::Result<()> {
    if config_file.exists() {
        log4rs::init_file(config_file, Default::default())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    } else {
        env_logger::init();
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_logging(&log_config_path())?;

    let config = AppConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let app_state = AppState::from_config(config).await.map_err(|e| {
        error!("Failed to initialize application state: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let server = app_state.config.server.clone();
    info!("Starting server on {}:{}", server.host, server.port);

    let data = web::Data::new(app_state);
    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(data.clone())
            .service(list_projects)
            .service(list_projects_preflight)
    })
    .workers(server.workers)
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
