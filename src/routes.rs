use crate::{
    api::{
        error::{INTERNAL_ERROR, json_error_handler, query_error_handler},
        registro, status,
    },
    config::Config,
    db::Storage,
    service::{ExportService, QueryService, RegistrationService},
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    Error, HttpResponse,
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::{StatusCode, header},
    middleware::{ErrorHandlerResponse, ErrorHandlers, Next, from_fn},
    web::{self, Data},
};
use serde_json::json;
use tracing::warn;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, storage: Storage) {
    cfg.app_data(Data::new(config.clone()))
        .app_data(Data::new(RegistrationService::new(storage.clone())))
        .app_data(Data::new(QueryService::new(storage.clone())))
        .app_data(Data::new(ExportService::new(storage.clone())))
        .app_data(Data::new(storage))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));

    // /registrar, rate limited per peer IP unless disabled
    match build_limiter(config.rate_register_per_min) {
        Some(limiter) => cfg.service(
            web::resource("/registrar")
                .wrap(limiter)
                .wrap(from_fn(json_too_many_requests))
                .route(web::post().to(registro::registrar)),
        ),
        None => cfg.service(web::resource("/registrar").route(web::post().to(registro::registrar))),
    };

    cfg.service(web::resource("/registros").route(web::get().to(registro::listar)))
        .service(web::resource("/exportar").route(web::get().to(registro::exportar)))
        .service(web::resource("/status").route(web::get().to(status::status)))
        .default_service(web::to(status::not_found));
}

fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    if requests_per_min == 0 {
        return None;
    }

    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish();

    match cfg {
        Some(cfg) => Some(Governor::new(&cfg)),
        None => {
            warn!(requests_per_min, "Invalid rate limit, /registrar left unlimited");
            None
        }
    }
}

pub const TOO_MANY_REQUESTS: &str = "Demasiadas solicitudes, intente más tarde";

/// The limiter rejects with a plain-text error; answer in the `{error}` shape.
async fn json_too_many_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let http_req = req.request().clone();
    let limited = match next.call(req).await {
        Ok(res) if res.status() != StatusCode::TOO_MANY_REQUESTS => {
            return Ok(res.map_into_boxed_body());
        }
        Err(err) if err.as_response_error().status_code() != StatusCode::TOO_MANY_REQUESTS => {
            return Err(err);
        }
        _ => HttpResponse::TooManyRequests().json(json!({ "error": TOO_MANY_REQUESTS })),
    };

    warn!(peer = ?http_req.peer_addr(), "Rate limit exceeded on /registrar");
    Ok(ServiceResponse::new(http_req, limited))
}

/// Replaces non-JSON 500 bodies (panics, extractor failures) with `{error}`.
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, render_internal_error)
}

fn render_internal_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let is_json = res
        .response()
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));

    if is_json {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let (req, _) = res.into_parts();
    let res = HttpResponse::InternalServerError().json(json!({ "error": INTERNAL_ERROR }));
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, res).map_into_right_body(),
    ))
}
