// src/services/notifier.rs

//! Discord webhook notifier.
//!
//! Downloads giveaway images into short-lived files and posts multipart
//! messages to the configured webhook. Delivery problems are reported as a
//! [`DeliveryOutcome`] and never abort a run.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use crate::error::{AppError, Result};
use crate::models::{Config, Posting};
use crate::services::Notifier;
use crate::utils::http;

/// A downloaded image that is removed from disk when dropped.
#[derive(Debug)]
pub struct TempImage {
    path: PathBuf,
    file_name: String,
}

impl TempImage {
    /// Write `bytes` to `dir/file_name`, creating `dir` if needed.
    pub async fn write(dir: &Path, file_name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        tokio::fs::create_dir_all(dir).await?;

        let file_name = file_name.into();
        // Constructed before writing so a failed write is still cleaned up.
        let image = Self {
            path: dir.join(&file_name),
            file_name,
        };
        tokio::fs::write(&image.path, bytes).await?;
        Ok(image)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed temporary image {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "Failed to remove temporary image {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Result of a webhook delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The webhook answered 200 or 204
    Delivered,
    /// The webhook answered with any other status
    Rejected { status: StatusCode, body: String },
    /// The request never got a response
    Unreachable { reason: String },
    /// Nothing was sent because the attachment could not be read
    NotSent { reason: String },
}

impl DeliveryOutcome {
    /// Classify a webhook response status.
    pub fn from_response(status: StatusCode, body: impl Into<String>) -> Self {
        if status == StatusCode::OK || status == StatusCode::NO_CONTENT {
            Self::Delivered
        } else {
            Self::Rejected {
                status,
                body: body.into(),
            }
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Whether a request reached the webhook endpoint at all.
    pub fn was_sent(&self) -> bool {
        !matches!(self, Self::NotSent { .. })
    }
}

/// Notifier backed by a Discord webhook.
pub struct WebhookNotifier {
    client: Client,
    webhook_url: String,
    image_dir: PathBuf,
}

impl WebhookNotifier {
    /// Create a notifier for the configured webhook and image directory.
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            webhook_url: config.discord_webhook_url.clone(),
            image_dir: config.paths.image_dir(),
        }
    }

    async fn build_form(message: &str, attachment: Option<&TempImage>) -> std::io::Result<Form> {
        let form = Form::new().text("content", message.to_string());
        let Some(image) = attachment else {
            return Ok(form);
        };

        let bytes = tokio::fs::read(image.path()).await?;
        Ok(form.part(
            "file",
            Part::bytes(bytes).file_name(image.file_name().to_string()),
        ))
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn download_image(&self, posting: &Posting) -> Result<TempImage> {
        if posting.image.is_empty() {
            return Err(AppError::validation(format!(
                "giveaway '{}' has no image URL",
                posting.title
            )));
        }
        let bytes = http::fetch_bytes(&self.client, &posting.image).await?;
        log::debug!("Downloaded {} bytes from {}", bytes.len(), posting.image);
        TempImage::write(&self.image_dir, posting.image_file_name(), &bytes).await
    }

    async fn notify(&self, message: &str, attachment: Option<&TempImage>) -> DeliveryOutcome {
        // A giveaway is never announced without its image.
        let form = match Self::build_form(message, attachment).await {
            Ok(form) => form,
            Err(e) => {
                let outcome = DeliveryOutcome::NotSent {
                    reason: format!("cannot read attachment: {e}"),
                };
                log::warn!("Message not sent to Discord: {}", e);
                return outcome;
            }
        };

        let outcome = match self
            .client
            .post(&self.webhook_url)
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                DeliveryOutcome::from_response(status, body)
            }
            Err(e) => DeliveryOutcome::Unreachable {
                reason: e.to_string(),
            },
        };

        match &outcome {
            DeliveryOutcome::Delivered => log::debug!("Webhook message delivered"),
            DeliveryOutcome::Rejected { status, body } => log::warn!(
                "Failed to send message to Discord. Status code: {}, Response: {}",
                status.as_u16(),
                body
            ),
            DeliveryOutcome::Unreachable { reason } => {
                log::warn!("Failed to send message to Discord: {}", reason)
            }
            DeliveryOutcome::NotSent { .. } => {}
        }

        outcome
    }
}
