use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

use leavedesk::config::Config;
use leavedesk::db::init_db;
use leavedesk::docs::ApiDoc;
use leavedesk::routes;
use leavedesk::service::leave::LeaveRequestService;
use leavedesk::store::mysql::{MySqlLeaveRequestStore, MySqlManagerStore, MySqlUserStore};
use leavedesk::store::{LeaveRequestStore, ManagerStore, UserStore};

use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "LeaveDesk API"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await?;

    let users: Arc<dyn UserStore> = Arc::new(MySqlUserStore::new(pool.clone()));
    let requests: Arc<dyn LeaveRequestStore> = Arc::new(MySqlLeaveRequestStore::new(pool.clone()));
    let managers: Arc<dyn ManagerStore> = Arc::new(MySqlManagerStore::new(pool.clone()));

    let leave_service = Data::new(LeaveRequestService::new(users.clone(), requests.clone()));
    let user_store: Data<dyn UserStore> = Data::from(users);
    let manager_store: Data<dyn ManagerStore> = Data::from(managers);

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .app_data(leave_service.clone())
            .app_data(user_store.clone())
            .app_data(manager_store.clone())
            .service(index)
            // Configure login + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
