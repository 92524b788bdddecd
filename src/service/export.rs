use crate::db::Storage;
use crate::error::{ServiceResult, require};
use crate::model::ExportRow;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::debug;

pub const SHEET_NAME: &str = "Registros";
pub const CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const HEADERS: [&str; 3] = ["codigo", "turno", "fecha"];

pub struct ExportService {
    storage: Storage,
}

impl ExportService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Workbook with today's check-ins for `turno`, in listing order.
    pub async fn export(&self, turno: &str) -> ServiceResult<Vec<u8>> {
        let turno = require("turno", turno)?;

        let rows = self.storage.list_today_for_export(turno).await?;
        let bytes = build_workbook(&rows)?;
        debug!(turno, rows = rows.len(), bytes = bytes.len(), "Built export");
        Ok(bytes)
    }
}

pub fn file_name(turno: &str) -> String {
    format!("registros_{}.xlsx", turno.trim())
}

/// `file_name` for clients that ignore `filename*`: anything outside
/// printable ASCII, plus quotes and path separators, becomes `_`.
pub fn ascii_file_name(turno: &str) -> String {
    file_name(turno)
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect()
}

pub fn build_workbook(rows: &[ExportRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, title) in HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &header)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            sheet.write_string(r, 0, row.codigo.as_str())?;
            sheet.write_string(r, 1, row.turno.as_str())?;
            sheet.write_string(r, 2, row.fecha.as_str())?;
        }

        sheet.set_column_width(2, 20)?;
    }

    workbook.save_to_buffer()
}
