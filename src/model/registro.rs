use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

pub const HORA_FORMAT: &str = "%H:%M:%S";
pub const FECHA_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One attendance event as persisted in `registros`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Registro {
    pub id: i64,
    pub codigo: String,
    pub turno: String,
    pub fecha: NaiveDateTime,
}

impl Registro {
    pub fn hora(&self) -> String {
        self.fecha.format(HORA_FORMAT).to_string()
    }
}

/// Time-of-day projection returned by `/registrar` and `/registros`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "codigo": "EMP-001",
        "turno": "mañana",
        "hora": "07:58:12"
    })
)]
pub struct RegistroView {
    pub id: i64,
    pub codigo: String,
    pub turno: String,
    #[schema(example = "07:58:12")]
    pub hora: String,
}

impl From<&Registro> for RegistroView {
    fn from(r: &Registro) -> Self {
        Self {
            id: r.id,
            codigo: r.codigo.clone(),
            turno: r.turno.clone(),
            hora: r.hora(),
        }
    }
}

/// Full date-time projection used for the spreadsheet export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub codigo: String,
    pub turno: String,
    pub fecha: String,
}

impl From<Registro> for ExportRow {
    fn from(r: Registro) -> Self {
        Self {
            fecha: r.fecha.format(FECHA_FORMAT).to_string(),
            codigo: r.codigo,
            turno: r.turno,
        }
    }
}
