pub mod html;
pub mod justjoinit;
pub mod registry;

use std::time::Duration;

use async_trait::async_trait;

use crate::model::Source;

/// Visible text of one listing card, in rendered order, plus its link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListing {
    pub url: String,
    pub lines: Vec<String>,
}

#[async_trait]
pub trait Collector: Send + Sync {
    fn source(&self) -> Source;

    /// Never fails: a timeout or transport error yields an empty batch.
    async fn collect(&self, timeout: Duration) -> Vec<RawListing>;
}
