use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use openmic_queue::auth::middleware::{DEVICE_HEADER, HostAuth};
use openmic_queue::cache::BoardCache;
use openmic_queue::config::AppConfig;
use openmic_queue::create_pool;
use openmic_queue::handlers;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let db = create_pool(&config.database_url).await;
    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .map_err(std::io::Error::other)?;
        tracing::info!("Migrations applied");
    }
    let db_data = web::Data::new(db);

    let board_cache = web::Data::new(BoardCache::new(config.board_cache_ttl));
    let host_auth = web::Data::new(HostAuth {
        passcode: config.host_passcode.clone(),
        secret: config.host_token_secret.clone(),
        token_ttl: config.host_token_ttl,
    });

    let bind_addr = config.bind_addr();
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .allowed_header(DEVICE_HEADER)
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(board_cache.clone())
            .app_data(host_auth.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
