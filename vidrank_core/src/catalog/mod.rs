//! Video catalog collaborator.
//!
//! The pipeline only sees the [`Catalog`] trait; [`youtube::YouTubeCatalog`]
//! is the shipped implementation over the YouTube Data API.

pub mod youtube;

use crate::config::DurationBucket;
use crate::error::CatalogError;
use crate::models::RawCandidate;
use async_trait::async_trait;

pub use youtube::YouTubeCatalog;

/// Parameters for one catalog search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub topic: String,
    pub max_results: u32,
    pub duration_bucket: DurationBucket,
}

/// Content and statistics for one item. Optional counters are already
/// defaulted to 0 by the implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetail {
    pub duration_token: String,
    pub views: u64,
    pub likes: u64,
    pub dislikes: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelDetail {
    pub subscribers: u64,
}

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns the catalog name used in logs.
    fn name(&self) -> &'static str;

    /// Search ordered by view count.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawCandidate>, CatalogError>;

    async fn video_detail(&self, catalog_id: &str) -> Result<VideoDetail, CatalogError>;

    async fn channel_detail(&self, channel_id: &str) -> Result<ChannelDetail, CatalogError>;
}
