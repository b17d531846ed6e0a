//! Liveblog core: pure feed state machine, event projection, and timeline reconciliation.
mod effect;
mod feed;
mod msg;
mod pending;
mod post;
mod project;
mod reconcile;
mod settings;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use feed::{
    BlogInfo, BlogStatus, Page, PageMeta, PostOrder, Segment, Segments, STICKY_POSTS_PER_PAGE,
};
pub use msg::Msg;
pub use pending::PendingUpdates;
pub use post::{decode_posts, Post, PostId, PostItem, PostStatus};
pub use project::{EventProjector, MalformedPost, StartDate, TimelineEvent};
pub use reconcile::{ReconcileReport, Reconciler, SegmentPhase, TimelineView, ViewHandle};
pub use settings::{UpdatePolicy, WidgetSettings};
pub use state::{ModeState, PollingState, WidgetState};
pub use update::update;
pub use view_model::WidgetViewModel;
