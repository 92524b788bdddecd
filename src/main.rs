use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{App, HttpServer};
use anyhow::Context;

use asistencia::config::Config;
use asistencia::db::Storage;
use asistencia::db::calendar::Calendar;
use asistencia::docs::ApiDoc;
use asistencia::{routes, telemetry};

use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let _guard = telemetry::init(&config);

    info!(
        environment = %config.environment,
        zone = %config.zone,
        "Server starting..."
    );

    let calendar = Calendar::system(config.zone);
    let storage = Storage::connect(&config.database_url, config.db_max_connections, calendar)
        .await
        .context("Failed to connect to database")?;
    storage.migrate().await.context("Failed to prepare schema")?;

    let server_addr = config.server_addr.clone();
    let pool_handle = storage.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(routes::error_handlers())
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .configure(|cfg| routes::configure(cfg, &config, storage.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    pool_handle.close().await;
    info!("Server stopped");
    Ok(())
}
