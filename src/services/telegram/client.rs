//! Telegram Bot API notifier

use crate::error::DeliveryError;
use crate::services::notifier::NotificationSink;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    token: String,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DeliveryError::Http)?;
        Ok(Self::with_client(api_url, token, client).with_timeout(timeout))
    }

    pub fn with_client(api_url: impl Into<String>, token: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            timeout: Duration::from_secs(30),
        }
    }

    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    fn map_send_error(&self, e: reqwest::Error) -> DeliveryError {
        if e.is_timeout() {
            DeliveryError::Timeout(self.timeout)
        } else {
            // reqwest errors carry the URL, which embeds the bot token
            DeliveryError::Http(e.without_url())
        }
    }

    async fn check(&self, response: reqwest::Response) -> Result<(), DeliveryError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        match serde_json::from_str::<ApiResponse>(&body) {
            Ok(api) if api.ok && status.is_success() => Ok(()),
            Ok(api) => Err(DeliveryError::Rejected {
                code: api.error_code.unwrap_or(status.as_u16() as i64),
                description: api.description.unwrap_or_else(|| "unknown error".to_string()),
            }),
            Err(_) => Err(DeliveryError::Rejected {
                code: status.as_u16() as i64,
                description: body.chars().take(200).collect(),
            }),
        }
    }
}

/// Raster formats go through `sendPhoto`; anything else is sent as a document.
fn upload_method(path: &Path) -> (&'static str, &'static str, &'static str) {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => ("sendPhoto", "photo", "image/png"),
        "jpg" | "jpeg" => ("sendPhoto", "photo", "image/jpeg"),
        "svg" => ("sendDocument", "document", "image/svg+xml"),
        _ => ("sendDocument", "document", "application/octet-stream"),
    }
}

#[async_trait::async_trait]
impl NotificationSink for TelegramNotifier {
    async fn send_text(&self, destination: &str, message: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&json!({ "chat_id": destination, "text": message }))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        self.check(response).await?;
        debug!(destination = %destination, "TelegramNotifier: message delivered");
        Ok(())
    }

    async fn send_image(&self, destination: &str, image_path: &Path, caption: &str) -> Result<(), DeliveryError> {
        let bytes = tokio::fs::read(image_path).await?;
        let (method, field, mime) = upload_method(image_path);
        let file_name = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("chart")
            .to_string();
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| self.map_send_error(e))?;
        let form = Form::new()
            .text("chat_id", destination.to_string())
            .text("caption", caption.to_string())
            .part(field, part);

        let response = self
            .client
            .post(self.method_url(method))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        self.check(response).await?;
        debug!(destination = %destination, method = method, "TelegramNotifier: image delivered");
        Ok(())
    }
}
