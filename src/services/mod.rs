//! External collaborators: price data in, notifications out.

pub mod market_data;
pub mod notifier;
pub mod telegram;
pub mod yahoo;

pub use market_data::PriceProvider;
pub use notifier::{LogNotifier, NotificationSink};
pub use telegram::TelegramNotifier;
pub use yahoo::YahooPriceProvider;
