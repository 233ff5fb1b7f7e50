pub mod amortization;
pub mod analysis;
pub mod assessment;
pub mod error;
pub mod grading;
pub mod metrics;
pub mod property;
pub mod types;

#[cfg(feature = "screening")]
pub mod screening;

pub use error::RentalAnalysisError;
pub use property::Property;
pub use types::*;

/// Standard result type for all rental-analysis operations
pub type RentalAnalysisResult<T> = Result<T, RentalAnalysisError>;
