//! Service layer for the giveaway watcher.
//!
//! - Listing scraping (`GiveawayScraper`)
//! - Image download and webhook delivery (`WebhookNotifier`)

mod giveaways;
mod notifier;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Posting;

pub use giveaways::{GiveawayScraper, parse_listing};
pub use notifier::{DeliveryOutcome, TempImage, WebhookNotifier};

/// Source of the current giveaway postings.
#[async_trait]
pub trait PostingSource: Send + Sync {
    /// Fetch and parse the current postings, in page order.
    async fn fetch_postings(&self) -> Result<Vec<Posting>>;
}

/// Outbound notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Download a posting's image into a temporary file.
    async fn download_image(&self, posting: &Posting) -> Result<TempImage>;

    /// Send a message with an optional attachment. Never fails the caller.
    async fn notify(&self, message: &str, attachment: Option<&TempImage>) -> DeliveryOutcome;
}
