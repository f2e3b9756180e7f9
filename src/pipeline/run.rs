// src/pipeline/run.rs

//! Giveaway watch pipeline: fetch → diff → notify → persist.

use crate::error::Result;
use crate::models::Posting;
use crate::pipeline::diff::calculate_diff;
use crate::services::{Notifier, PostingSource};
use crate::storage::SnapshotStore;

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Postings on the listing page
    pub fetched: usize,
    /// False when there was no previous snapshot to compare against
    pub compared: bool,
    /// Titles of new postings, in page order
    pub added: Vec<String>,
    /// Number of titles no longer listed
    pub removed: usize,
    /// Notifications sent (delivered or not)
    pub notified: usize,
    /// Notifications the webhook accepted
    pub delivered: usize,
    /// New postings skipped because their image could not be downloaded
    /// or attached
    pub skipped: usize,
}

/// Run the pipeline once.
///
/// The snapshot is replaced with the current postings whenever the fetch
/// succeeds, even if some notifications failed or there was nothing to
/// compare against.
pub async fn run_watch(
    source: &dyn PostingSource,
    store: &dyn SnapshotStore,
    notifier: &dyn Notifier,
) -> Result<RunReport> {
    let current = source.fetch_postings().await?;
    let previous = store.load().await?;

    let mut report = RunReport {
        fetched: current.len(),
        ..RunReport::default()
    };

    if previous.is_empty() {
        log::info!("No previous data to compare.");
    } else {
        report.compared = true;
        let diff = calculate_diff(&previous, &current);
        report.removed = diff.removed.len();

        if !diff.removed.is_empty() {
            log::debug!("{} giveaways are no longer listed", diff.removed.len());
        }

        if diff.added.is_empty() {
            log::info!("No new giveaways detected.");
        } else {
            log::info!("New giveaways detected:");
            for posting in current.iter().filter(|p| diff.is_added(p)) {
                notify_posting(posting, notifier, &mut report).await;
            }
        }
    }

    store.save(&current).await?;

    Ok(report)
}

/// Run the pipeline and report any failure to the webhook.
///
/// Returns `None` when the run failed. The failure has then been logged and
/// a best-effort error message has been sent.
pub async fn run_with_reporting(
    source: &dyn PostingSource,
    store: &dyn SnapshotStore,
    notifier: &dyn Notifier,
) -> Option<RunReport> {
    match run_watch(source, store, notifier).await {
        Ok(report) => Some(report),
        Err(e) => {
            let message = format!("An error occurred: {e}");
            log::error!("{}", message);
            notifier.notify(&message, None).await;
            None
        }
    }
}

async fn notify_posting(posting: &Posting, notifier: &dyn Notifier, report: &mut RunReport) {
    log::info!(" - {}", posting.title);
    report.added.push(posting.title.clone());

    let image = match notifier.download_image(posting).await {
        Ok(image) => image,
        Err(e) => {
            log::error!("Error downloading image: {}", e);
            report.skipped += 1;
            return;
        }
    };

    let outcome = notifier.notify(&posting.message(), Some(&image)).await;
    drop(image);

    if !outcome.was_sent() {
        report.skipped += 1;
        return;
    }
    report.notified += 1;
    if outcome.is_delivered() {
        report.delivered += 1;
    }
}
