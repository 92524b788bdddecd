use crate::api::error::ApiError;
use crate::config::Config;
use crate::model::RegistroView;
use crate::service::export::{CONTENT_TYPE, ascii_file_name, file_name};
use crate::service::{ExportService, QueryService, RegistrationService};
use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct RegistrarRequest {
    #[schema(example = "EMP-001")]
    pub codigo: Option<String>,
    #[schema(example = "mañana")]
    pub turno: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RegistrarResponse {
    #[schema(example = "Registro exitoso")]
    pub message: String,
    pub registro: RegistroView,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TurnoQuery {
    /// Shift to scope the listing to
    #[param(example = "mañana")]
    pub turno: Option<String>,
}

impl TurnoQuery {
    fn turno(&self) -> &str {
        self.turno.as_deref().unwrap_or_default()
    }
}

/// Register today's check-in
#[utoipa::path(
    post,
    path = "/registrar",
    request_body = RegistrarRequest,
    responses(
        (status = 200, description = "Check-in registered", body = RegistrarResponse),
        (status = 400, description = "Missing field or already registered today", body = Object, example = json!({
            "error": "El empleado ya se registró hoy en este turno"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Registros"
)]
pub async fn registrar(
    service: web::Data<RegistrationService>,
    config: web::Data<Config>,
    payload: web::Json<RegistrarRequest>,
) -> Result<impl Responder, ApiError> {
    let payload = payload.into_inner();
    let codigo = payload.codigo.unwrap_or_default();
    let turno = payload.turno.unwrap_or_default();

    let registro = service
        .register(&codigo, &turno)
        .await
        .map_err(|e| ApiError::from_service(e, config.environment))?;

    Ok(HttpResponse::Ok().json(RegistrarResponse {
        message: "Registro exitoso".to_string(),
        registro: RegistroView::from(&registro),
    }))
}

/// List today's check-ins for a shift, most recent first
#[utoipa::path(
    get,
    path = "/registros",
    params(TurnoQuery),
    responses(
        (status = 200, description = "Today's check-ins", body = [RegistroView]),
        (status = 400, description = "Missing turno"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Registros"
)]
pub async fn listar(
    service: web::Data<QueryService>,
    config: web::Data<Config>,
    query: web::Query<TurnoQuery>,
) -> Result<impl Responder, ApiError> {
    let registros = service
        .list(query.turno())
        .await
        .map_err(|e| ApiError::from_service(e, config.environment))?;

    let views: Vec<RegistroView> = registros.iter().map(RegistroView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

/// Download today's check-ins for a shift as an XLSX workbook
#[utoipa::path(
    get,
    path = "/exportar",
    params(TurnoQuery),
    responses(
        (status = 200, description = "Spreadsheet attachment", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Missing turno"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Registros"
)]
pub async fn exportar(
    service: web::Data<ExportService>,
    config: web::Data<Config>,
    query: web::Query<TurnoQuery>,
) -> Result<impl Responder, ApiError> {
    let turno = query.turno();
    let bytes = service
        .export(turno)
        .await
        .map_err(|e| ApiError::from_service(e, config.environment))?;

    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(ascii_file_name(turno)),
            DispositionParam::FilenameExt(ExtendedValue {
                charset: Charset::Ext("UTF-8".to_string()),
                language_tag: None,
                value: file_name(turno).into_bytes(),
            }),
        ],
    };

    Ok(HttpResponse::Ok()
        .content_type(CONTENT_TYPE)
        .insert_header(disposition)
        .body(bytes))
}
