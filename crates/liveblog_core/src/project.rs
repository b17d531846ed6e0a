use std::fmt::Write as _;

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};
use feed_logging::feed_warn;
use serde::Serialize;
use thiserror::Error;

use crate::{Post, PostId, WidgetSettings};

const ITEM_SEPARATOR: &str = "<br />";

/// A post that could not be fully projected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedPost {
    #[error("post {post_id} has no published date")]
    MissingTimestamp { post_id: PostId },
    #[error("post {post_id} has unparseable published date {raw:?}")]
    Timestamp { post_id: PostId, raw: String },
    #[error("date format {format:?} cannot render post {post_id}")]
    Format { post_id: PostId, format: String },
}

/// Calendar fields of an event start, all taken from one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StartDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Display-only projection of one post at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    #[serde(skip)]
    pub post_id: PostId,
    pub start_date: Option<StartDate>,
    pub display_date: Option<String>,
    pub text: String,
}

impl TimelineEvent {
    pub fn has_date(&self) -> bool {
        self.start_date.is_some()
    }
}

/// Maps posts to timeline events. Pure apart from logging.
#[derive(Debug, Clone)]
pub struct EventProjector {
    format: String,
    offset: FixedOffset,
}

impl Default for EventProjector {
    fn default() -> Self {
        Self::from_settings(&WidgetSettings::default())
    }
}

impl EventProjector {
    pub fn new(format: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            format: format.into(),
            offset,
        }
    }

    pub fn from_settings(settings: &WidgetSettings) -> Self {
        let offset = settings
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                feed_warn!(
                    "utc_offset_minutes={} out of range, using UTC",
                    settings.utc_offset_minutes
                );
                Utc.fix()
            });
        Self::new(settings.datetime_format.clone(), offset)
    }

    /// Project a post; date problems leave the date fields empty.
    pub fn project(&self, post: &Post) -> TimelineEvent {
        match self.try_project(post) {
            Ok(event) => event,
            Err(err) => {
                feed_warn!("Rendering post without date: {}", err);
                TimelineEvent {
                    post_id: post.id.clone(),
                    start_date: None,
                    display_date: None,
                    text: render_text(post),
                }
            }
        }
    }

    /// Project a post, reporting date problems instead of hiding them.
    pub fn try_project(&self, post: &Post) -> Result<TimelineEvent, MalformedPost> {
        let raw = post
            .published_date
            .as_deref()
            .ok_or_else(|| MalformedPost::MissingTimestamp {
                post_id: post.id.clone(),
            })?;
        let published = parse_timestamp(raw)
            .ok_or_else(|| MalformedPost::Timestamp {
                post_id: post.id.clone(),
                raw: raw.to_string(),
            })?
            .with_timezone(&self.offset);

        let mut display_date = String::new();
        write!(display_date, "{}", published.format(&self.format)).map_err(|_| {
            MalformedPost::Format {
                post_id: post.id.clone(),
                format: self.format.clone(),
            }
        })?;

        Ok(TimelineEvent {
            post_id: post.id.clone(),
            start_date: Some(StartDate {
                year: published.year(),
                month: published.month(),
                day: published.day(),
                hour: published.hour(),
                minute: published.minute(),
            }),
            display_date: Some(display_date),
            text: render_text(post),
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
}

/// Item texts in order, separated by line breaks.
fn render_text(post: &Post) -> String {
    let mut html = String::new();
    for item in &post.items {
        if !html.is_empty() {
            html.push_str(ITEM_SEPARATOR);
        }
        html.push_str(&item.text);
    }
    html
}
