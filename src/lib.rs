pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::checkout_service::CheckoutService;
use domain::ports::PaymentGateway;
use infrastructure::order_store::DieselOrderStore;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(paths(
    handlers::checkout::create_checkout,
    handlers::payments::initiate_payment,
    handlers::payments::mpesa_callback,
    handlers::orders::get_order,
))]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The gateway is injected so tests can drive the full checkout flow against
/// a stub provider. The caller is responsible for `.await`-ing (or
/// `tokio::spawn`-ing) the returned server.
pub fn build_server(
    pool: DbPool,
    gateway: Arc<dyn PaymentGateway>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = CheckoutService::new(Arc::new(DieselOrderStore::new(pool)), gateway);

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/checkout")
                    .route("", web::post().to(handlers::checkout::create_checkout)),
            )
            .service(
                web::scope("/payments")
                    .route("/initiate", web::post().to(handlers::payments::initiate_payment))
                    .route("/callback", web::post().to(handlers::payments::mpesa_callback)),
            )
            .service(
                web::scope("/orders").route("/{id}", web::get().to(handlers::orders::get_order)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
