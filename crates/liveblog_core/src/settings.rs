use serde::Deserialize;

use crate::{PostOrder, Segment, Segments};

/// Embed settings for one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    pub posts_per_page: u32,
    pub post_order: PostOrder,
    pub load_new_posts_manually: bool,
    /// Falls back to `load_new_posts_manually` when absent.
    pub load_new_sticky_posts_manually: Option<bool>,
    /// chrono strftime pattern for `TimelineEvent::display_date`.
    pub datetime_format: String,
    /// Fixed offset every calendar field is derived in.
    pub utc_offset_minutes: i32,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            post_order: PostOrder::Editorial,
            load_new_posts_manually: false,
            load_new_sticky_posts_manually: None,
            datetime_format: "%B %-d, %Y %H:%M".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl WidgetSettings {
    pub fn update_policies(&self) -> Segments<UpdatePolicy> {
        let primary = UpdatePolicy::from_manual_flag(self.load_new_posts_manually);
        let sticky = UpdatePolicy::from_manual_flag(
            self.load_new_sticky_posts_manually
                .unwrap_or(self.load_new_posts_manually),
        );
        Segments::new(primary, sticky)
    }

    pub fn page_size(&self, segment: Segment) -> u32 {
        segment.page_size(self.posts_per_page)
    }
}

/// How polled updates reach the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    #[default]
    Automatic,
    /// Buffered until the reader asks for them.
    Manual,
}

impl UpdatePolicy {
    pub fn from_manual_flag(manual: bool) -> Self {
        if manual {
            UpdatePolicy::Manual
        } else {
            UpdatePolicy::Automatic
        }
    }
}
