pub mod registro;

pub use registro::{ExportRow, Registro, RegistroView};
