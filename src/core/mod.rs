pub mod dates;
pub mod error;

pub use dates::{month_key, DateRange};
pub use error::{AppError, Result};
