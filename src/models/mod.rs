pub mod period;
pub mod query;
pub mod report;
pub mod schema;
pub mod station;

pub use period::*;
pub use query::*;
pub use report::*;
pub use schema::*;
pub use station::*;

/// Placeholder the station map prints for a missing reading.
pub const NO_DATA_SENTINEL: &str = "S/D";
/// Value written in place of [`NO_DATA_SENTINEL`].
pub const NO_DATA_VALUE: &str = "0.0";
