//! The built-in checkers.

pub mod duplicate_index;
pub mod measurement;
pub mod register_size;
pub mod reserved;

pub use duplicate_index::DuplicateIndex;
pub use measurement::MeasurementOrder;
pub use register_size::RegisterSize;
pub use reserved::Reserved;
