//! API models for the relayed news feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A relayed feed entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsItem {
    pub title: String,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub summary: Option<String>,
}

impl NewsItem {
    pub fn from_entry(entry: feed_rs::model::Entry) -> Self {
        Self {
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            link: entry.links.into_iter().next().map(|l| l.href),
            published: entry.published,
            summary: entry.summary.map(|t| t.content),
        }
    }
}
