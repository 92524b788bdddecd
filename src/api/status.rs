use crate::config::Config;
use crate::db::Storage;
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde_json::json;
use tracing::error;

/// Service and database health
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Database reachable", body = Object, example = json!({
            "status": "OK",
            "database": "Connected",
            "timestamp": "2026-03-10T13:00:00Z"
        })),
        (status = 500, description = "Database unreachable", body = Object, example = json!({
            "status": "Error",
            "database": "Disconnected",
            "error": "pool timed out while waiting for an open connection"
        }))
    ),
    tag = "Status"
)]
pub async fn status(storage: web::Data<Storage>, config: web::Data<Config>) -> impl Responder {
    match storage.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "OK",
            "database": "Connected",
            "timestamp": Utc::now().to_rfc3339(),
        })),
        Err(e) => {
            error!(error = %e, "Status check failed");
            let detail = if config.environment.is_production() {
                "Database unreachable".to_string()
            } else {
                e.to_string()
            };
            HttpResponse::InternalServerError().json(json!({
                "status": "Error",
                "database": "Disconnected",
                "error": detail,
            }))
        }
    }
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(json!({ "error": "Ruta no encontrada" }))
}
