//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod instrument;
pub mod notification;
pub mod state;

pub use indicators::{IndicatorSnapshot, IndicatorValue, PricePoint, PriceSeries, RsiHistory};
pub use instrument::Instrument;
pub use notification::{Notification, Transition};
pub use state::{MarketState, StateRecord};
