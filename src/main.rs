use actix_cors::Cors;
use actix_web::{cookie::Key, http::header, middleware::{DefaultHeaders, Logger}, web, App, HttpServer};
use clap::Parser;
use masjid_backend::{
    config::Config,
    models::{content_store::SqliteContentStore, identity::SqliteIdentityService},
    routes,
    AppState,
};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use redb::Database;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "masjid_server", author, version, about = "Starts the masjid website and admin panel.")]
struct Cli {
    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

fn build_cors(allowed_origins: &str) -> Cors {
    let cors = if allowed_origins.trim() == "*" {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}

fn session_key(hex_key: &str) -> Key {
    let bytes = hex::decode(hex_key).expect("SESSION_SECRET_KEY is not valid hex");
    Key::try_from(bytes.as_slice()).expect("SESSION_SECRET_KEY decodes to fewer than 64 bytes")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env(&cli.env_file).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    let tera = routes::load_templates("templates/**/*.html").expect("templates failed to parse");

    let content_db_path = config.content_db_path();
    if !content_db_path.exists() {
        log::error!("{} is missing. Run `setup_cli --env-file <path> db setup` first.", content_db_path.display());
        std::process::exit(1);
    }
    let pool = Pool::builder()
        .build(SqliteConnectionManager::file(&content_db_path))
        .expect("could not build the content connection pool");
    let inbox_db = web::Data::new(
        Database::open(config.inbox_db_path()).expect("inbox database missing. Run `setup_cli db setup inbox`"),
    );

    let app_state = web::Data::new(AppState::new(
        Arc::new(SqliteContentStore::new(pool.clone())),
        Arc::new(SqliteIdentityService::new(pool)),
    ));
    let session_key = session_key(&config.session_secret_key);

    let server_address = format!("{}:{}", config.web.host, config.web.port);
    log::info!("Masjid site listening on http://{}, admin panel at {}", server_address, config.admin_base_url());

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.allowed_origins))
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("Referrer-Policy", "strict-origin-when-cross-origin"))
            )
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(inbox_db.clone())
            .app_data(app_state.clone())
            .configure(routes::public::config_api)
            .service(actix_files::Files::new("/static", "./static"))
            .service(routes::site_service(&config, session_key.clone()))
    })
    .bind(server_address)?
    .run()
    .await
}
