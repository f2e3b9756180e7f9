//! Storage abstractions for the posting snapshot.
//!
//! The snapshot is a single flat JSON array holding the postings seen on the
//! previous run. It is read once at the start of a run and replaced wholesale
//! at the end.
//!
//! ```text
//! giveaways.json
//! [
//!     {
//!         "title": "...",
//!         "description": "...",
//!         "link": "https://...",
//!         "image": "https://..."
//!     }
//! ]
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Posting;

// Re-export for convenience
pub use local::LocalSnapshotStore;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the previous postings. A missing snapshot loads as empty.
    async fn load(&self) -> Result<Vec<Posting>>;

    /// Replace the snapshot with `postings`.
    async fn save(&self, postings: &[Posting]) -> Result<()>;
}
