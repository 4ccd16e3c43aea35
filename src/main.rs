use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use retraite_algo::config::{LoggingSettings, ServerSettings, Settings};
use retraite_algo::core::Engine;
use retraite_algo::routes::{self, handle_query_payload_error, AppState};
use retraite_algo::services::{CatalogueCache, PostgresClient};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging; RUST_LOG overrides the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn build_cors(server: &ServerSettings) -> Cors {
    if server.allowed_origins.is_empty() {
        return Cors::permissive();
    }

    server
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(format!("Configuration error: {}", e)));
        }
    };

    init_tracing(&settings.logging);
    info!("Starting Retraite Algo commune service...");

    let postgres = PostgresClient::from_settings(&settings.database)
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::io::Error::other(format!("PostgreSQL connection error: {}", e))
        })?;

    info!("PostgreSQL client initialized");

    let cache = Arc::new(CatalogueCache::new(settings.cache.capacity, settings.cache.ttl_secs));

    let engine = Engine::new(settings.query.filter_defaults());
    let default_weights = settings.scoring.default_weights();

    info!("Engine initialized with default weights: {:?}", default_weights);

    let app_state = AppState {
        store: Arc::new(postgres),
        cache,
        engine,
        default_weights,
        weight_bounds: settings.scoring.bounds(),
    };

    // Configure HTTP server
    let server = settings.server.clone();
    let workers = server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", server.host, server.port);

    let bind = (server.host.clone(), server.port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(build_cors(&server))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind(bind)?
    .run()
    .await
}
