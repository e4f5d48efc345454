//! Technical indicators computed from daily closes.

pub mod momentum;
pub mod trend;

pub use momentum::*;
pub use trend::*;
