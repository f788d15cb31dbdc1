use actix_cors::Cors;
use actix_web::middleware::{Condition, Logger};
use actix_web::{App, HttpServer, http, web};
use anyhow::Context;
use dotenv::dotenv;
use env_logger::Env;
use linktrace::config::AppConfig;
use linktrace::db::Store;
use linktrace::routes::init_routes;
use linktrace::state::app_state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().context("Invalid configuration")?;

    // Create the tables up front so the first request doesn't pay for it
    let store = Store::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database at {}",
            config.database_path.display()
        )
    })?;
    log::info!("Using database {}", store.path().display());

    // Create shared state
    let app_state = web::Data::new(AppState::new(store, &config));
    let cors_origins = config.cors_allowed_origins.clone();

    log::info!("Listening on {}:{}", config.bind_address, config.port);

    // Start the Actix Web server
    HttpServer::new(move || {
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");

        // CORS only when origins are configured; same-origin pages need none
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allowed_headers(vec![http::header::ACCEPT])
            .allowed_header(http::header::CONTENT_TYPE)
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Condition::new(!cors_origins.is_empty(), cors))
            .wrap(logger)
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
