//! Per-instrument evaluation jobs

pub mod context;
pub mod handlers;
pub mod types;

pub use context::JobContext;
pub use handlers::handle_evaluate_instrument;
pub use types::{DeliveryOutcome, EvaluateInstrumentJob, InstrumentOutcome, InstrumentReport};
