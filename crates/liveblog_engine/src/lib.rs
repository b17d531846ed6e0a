//! Liveblog engine: collaborators, polling, and the widget message loop.
mod bridge;
mod debounce;
mod fetch;
mod scheduler;
mod source;
mod types;
mod widget;

pub use bridge::{LoadMoreBridge, LOAD_MORE_DEBOUNCE, LOAD_MORE_SIGNAL};
pub use debounce::Debouncer;
pub use fetch::{FetchSettings, ReqwestBlogSource};
pub use scheduler::{PollScheduler, STATUS_POLL_FACTOR};
pub use source::{BlogSource, NoPermalink, PageSource, PermalinkResolver, StaticBlogSource};
pub use types::{FailureKind, PermalinkError, TransportError};
pub use widget::{spawn, Collaborators, WidgetConfig, WidgetHandle, UPDATE_EVERY};
