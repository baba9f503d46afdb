// Utility functions
pub mod error;
pub mod uploads;

pub use error::*;
