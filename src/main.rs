use std::io;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use docsage_server::{
    app_state::AppState,
    config::Config,
    handlers::{self, setup_required},
    middleware::RequestIdMiddleware,
    services::session_service::spawn_idle_sweeper,
};

const ACCESS_LOG_FORMAT: &str = r#"%a "%r" %s %b %Ts request_id=%{x-request-id}o"#;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|err| {
        log::error!("{}", err);
        io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
    })?;

    match AppState::new(config.clone()) {
        Ok(state) => serve(state, &config).await,
        Err(err) => {
            log::error!("{}", err);
            serve_setup_instructions(&config).await
        }
    }
}

async fn serve(state: AppState, config: &Config) -> io::Result<()> {
    match spawn_idle_sweeper(state.session_service.clone()) {
        Some(_) => log::info!(
            "Idle sessions expire after {} seconds",
            config.idle_session_ttl_secs
        ),
        None => log::info!("Idle session expiry disabled"),
    }

    log::info!(
        "Starting HTTP server on {}:{} (model {})",
        config.web_server_host,
        config.web_server_port,
        config.llm_model_name
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(ACCESS_LOG_FORMAT))
            .wrap(Cors::permissive())
            .configure(handlers::configure)
    })
    .bind((config.web_server_host.as_str(), config.web_server_port))?
    .run()
    .await
}

/// Without an API key every request gets the setup instructions.
async fn serve_setup_instructions(config: &Config) -> io::Result<()> {
    log::warn!(
        "Starting HTTP server on {}:{} in setup mode",
        config.web_server_host,
        config.web_server_port
    );

    HttpServer::new(|| {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(ACCESS_LOG_FORMAT))
            .default_service(web::to(setup_required))
    })
    .bind((config.web_server_host.as_str(), config.web_server_port))?
    .run()
    .await
}
