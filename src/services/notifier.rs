//! Notification sink interface.

use crate::error::DeliveryError;
use std::path::Path;
use tracing::info;

#[async_trait::async_trait]
pub trait NotificationSink {
    async fn send_text(&self, destination: &str, message: &str) -> Result<(), DeliveryError>;

    async fn send_image(&self, destination: &str, image_path: &Path, caption: &str) -> Result<(), DeliveryError>;
}

/// Dry-run sink: logs what would have been sent.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl NotificationSink for LogNotifier {
    async fn send_text(&self, destination: &str, message: &str) -> Result<(), DeliveryError> {
        info!(destination = %destination, message = %message, "LogNotifier: text notification");
        Ok(())
    }

    async fn send_image(&self, destination: &str, image_path: &Path, caption: &str) -> Result<(), DeliveryError> {
        info!(
            destination = %destination,
            path = %image_path.display(),
            caption = %caption,
            "LogNotifier: image notification"
        );
        Ok(())
    }
}
