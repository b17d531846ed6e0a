use std::fmt;

use feed_logging::feed_warn;
use serde::{Deserialize, Serialize};

/// Stable identity of a post across polls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Open,
    Draft,
    Submitted,
    /// Any status the feed reports that this widget does not know about.
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostItem {
    #[serde(default)]
    pub text: String,
}

impl PostItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One post as delivered by the remote feed.
///
/// Only `id` is immutable; every other field may change between polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    /// Last modification stamp, used by page sources to bound update queries.
    #[serde(rename = "_updated", default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default)]
    pub items: Vec<PostItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(rename = "post_status", default)]
    pub status: PostStatus,
    #[serde(default)]
    pub sticky: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub highlight: bool,
}

impl Post {
    /// An open, non-deleted, non-sticky post without items.
    pub fn open(id: impl Into<String>) -> Self {
        Self {
            id: PostId::new(id),
            updated: None,
            items: Vec::new(),
            published_date: None,
            status: PostStatus::Open,
            sticky: false,
            deleted: false,
            highlight: false,
        }
    }

    /// Whether this post should have an event on the timeline.
    pub fn is_visible(&self) -> bool {
        self.status == PostStatus::Open && !self.deleted
    }
}

/// Decode raw API items one by one, skipping those that are not posts.
///
/// A single bad item never costs the rest of the batch.
pub fn decode_posts(items: Vec<serde_json::Value>) -> Vec<Post> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Post>(item) {
            Ok(post) => Some(post),
            Err(err) => {
                feed_warn!("Skipping undecodable post at index {}: {}", index, err);
                None
            }
        })
        .collect()
}
