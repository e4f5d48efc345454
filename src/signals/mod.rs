//! Classification and alerting.

pub mod classifier;
pub mod engine;
pub mod transitions;

pub use classifier::{classify, classify_value, RsiThresholds};
pub use engine::{AlertDecision, AlertEngine, AlertPolicy, Delivery, InstrumentEvaluation};
pub use transitions::next_transition;
