pub mod error;
pub mod registro;
pub mod status;

pub use error::ApiError;
