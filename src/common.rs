pub mod coerce;
pub mod error;

pub use error::AppError;
