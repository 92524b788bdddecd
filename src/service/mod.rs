pub mod export;
pub mod query;
pub mod registration;

pub use export::ExportService;
pub use query::QueryService;
pub use registration::RegistrationService;
