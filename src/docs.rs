use crate::api::registro::{RegistrarRequest, RegistrarResponse};
use crate::model::RegistroView;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Asistencia API",
        version = "1.0.0",
        description = r#"
## Shift attendance

Employees check in once per shift per calendar day. Supervisors list today's
check-ins for a shift or download them as a spreadsheet.

- **POST /registrar**: register a check-in, rejected when the employee already
  checked in today for that shift
- **GET /registros**: today's check-ins for a shift, most recent first
- **GET /exportar**: the same rows as an XLSX workbook
- **GET /status**: service and database health

"Today" is the calendar day in the server's configured time zone.
"#,
    ),
    paths(
        crate::api::registro::registrar,
        crate::api::registro::listar,
        crate::api::registro::exportar,
        crate::api::status::status
    ),
    components(schemas(RegistrarRequest, RegistrarResponse, RegistroView)),
    tags(
        (name = "Registros", description = "Check-in registration, listing and export"),
        (name = "Status", description = "Health check"),
    )
)]
pub struct ApiDoc;
