use actix_web::{middleware, web, App, HttpServer};
use chrono::Utc;
use redconnect::config::{LoggingSettings, Settings};
use redconnect::core::Matcher;
use redconnect::routes::{self, flash, AppState};
use redconnect::services::{seed_if_empty, Notifier, RegistryStore};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.pretty().init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting RedConnect donor registry...");

    let store = RegistryStore::from_settings(&settings.database)
        .await
        .map_err(|e| startup_error("Failed to open registry database", e))?;

    info!(
        "Registry database ready (max: {} connections)",
        settings.database.max_connections
    );

    if settings.registry.seed_demo_data {
        seed_if_empty(&store, Utc::now().date_naive())
            .await
            .map_err(|e| startup_error("Failed to seed demo data", e))?;
    }

    let notifier = Notifier::from_settings(&settings.mail)
        .map_err(|e| startup_error("Failed to set up mail relay", e))?;

    if notifier.mail_enabled() {
        info!(
            "Match emails go through {}:{}",
            settings.mail.server, settings.mail.port
        );
    } else {
        info!("Mail not configured, matches are only logged");
    }

    let app_state = AppState::new(store, Matcher::default(), notifier);
    let session_key = flash::session_key(&settings.session.secret_key);
    let cookie_secure = settings.session.cookie_secure;

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(flash::session_middleware(session_key.clone(), cookie_secure))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
