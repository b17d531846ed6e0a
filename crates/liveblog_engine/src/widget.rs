//! The widget message loop.
//!
//! One task owns the state, the reconciler, and the timeline view, and
//! handles messages strictly one at a time. Network calls run as separate
//! tasks and report back through the same channel, so their results are
//! applied in arrival order.

use std::sync::Arc;
use std::time::Duration;

use feed_logging::{feed_debug, feed_info};
use liveblog_core::{
    update, BlogInfo, Effect, EventProjector, Msg, Page, PostOrder, Reconciler, Segment,
    Segments, TimelineView, WidgetSettings, WidgetState, WidgetViewModel,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    BlogSource, LoadMoreBridge, PageSource, PermalinkResolver, PollScheduler, TransportError,
    LOAD_MORE_DEBOUNCE,
};

/// Content poll interval.
pub const UPDATE_EVERY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub settings: WidgetSettings,
    /// Blog metadata known at embed time.
    pub blog: BlogInfo,
    pub update_every: Duration,
    pub load_more_debounce: Duration,
}

impl WidgetConfig {
    pub fn new(settings: WidgetSettings, blog: BlogInfo) -> Self {
        Self {
            settings,
            blog,
            update_every: UPDATE_EVERY,
            load_more_debounce: LOAD_MORE_DEBOUNCE,
        }
    }
}

/// The remote side of the widget.
#[derive(Clone)]
pub struct Collaborators {
    pub pages: Segments<Arc<dyn PageSource>>,
    pub blog: Arc<dyn BlogSource>,
    pub permalink: Arc<dyn PermalinkResolver>,
}

/// Control surface of a running widget.
pub struct WidgetHandle {
    msg_tx: mpsc::UnboundedSender<Msg>,
    view_rx: watch::Receiver<WidgetViewModel>,
    bridge: LoadMoreBridge,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl WidgetHandle {
    pub fn dispatch(&self, msg: Msg) {
        if self.msg_tx.send(msg).is_err() {
            feed_debug!("Widget loop gone, message dropped");
        }
    }

    /// Next page of the primary segment, if the paging flags allow it.
    pub fn load_more(&self) {
        self.dispatch(Msg::LoadMoreRequested);
    }

    pub fn set_order(&self, order: PostOrder) {
        self.dispatch(Msg::OrderSelected(order));
    }

    pub fn toggle_highlights(&self) {
        self.dispatch(Msg::HighlightsToggled);
    }

    pub fn toggle_sticky(&self) {
        self.dispatch(Msg::StickyVisibilityToggled);
    }

    pub fn apply_pending(&self) {
        self.dispatch(Msg::ApplyPendingClicked);
    }

    /// Feed a message from the embedding page's messaging channel.
    pub fn post_message(&self, payload: &str) -> bool {
        self.bridge.receive(payload)
    }

    pub fn view_model(&self) -> WidgetViewModel {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetViewModel> {
        self.view_rx.clone()
    }

    /// Stop the loop and the polls. In-flight fetches finish on their own.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        let _ = self.task.await;
    }
}

/// Start a widget on the current tokio runtime and request its first page.
pub fn spawn<V>(config: WidgetConfig, collaborators: Collaborators, view: V) -> WidgetHandle
where
    V: TimelineView + Send + 'static,
{
    let (msg_tx, msg_rx) = mpsc::unbounded_channel();
    let state = WidgetState::new(&config.settings, config.blog.blog_status);
    let (view_tx, view_rx) = watch::channel(state.view());
    let shutdown = CancellationToken::new();

    let bridge = {
        let msg_tx = msg_tx.clone();
        LoadMoreBridge::new(config.load_more_debounce, move || {
            let _ = msg_tx.send(Msg::LoadMoreSignalled);
        })
    };

    let runtime = WidgetRuntime {
        state,
        reconciler: Reconciler::new(view, EventProjector::from_settings(&config.settings)),
        collaborators,
        scheduler: None,
        update_every: config.update_every,
        msg_tx: msg_tx.clone(),
        view_tx,
    };
    let task = tokio::spawn(runtime.run(msg_rx, shutdown.clone()));

    let handle = WidgetHandle {
        msg_tx,
        view_rx,
        bridge,
        shutdown,
        task,
    };
    handle.dispatch(Msg::Started);
    handle
}

struct WidgetRuntime<V> {
    state: WidgetState,
    reconciler: Reconciler<V>,
    collaborators: Collaborators,
    scheduler: Option<PollScheduler>,
    update_every: Duration,
    msg_tx: mpsc::UnboundedSender<Msg>,
    view_tx: watch::Sender<WidgetViewModel>,
}

impl<V: TimelineView> WidgetRuntime<V> {
    async fn run(mut self, mut msg_rx: mpsc::UnboundedReceiver<Msg>, shutdown: CancellationToken) {
        loop {
            let msg = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                msg = msg_rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
            };
            self.dispatch_msg(msg);
        }
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
        feed_info!("Widget loop finished");
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
        self.publish();
    }

    fn publish(&mut self) {
        let mut view = self.state.view();
        view.timeline_events = self.reconciler.len();
        let was_dirty = self.state.consume_dirty();
        self.view_tx.send_if_modified(move |current| {
            let changed = was_dirty || current.timeline_events != view.timeline_events;
            if changed {
                *current = view;
            }
            changed
        });
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchNextPage { segment } => {
                let source = self.page_source(segment);
                self.spawn_request(async move {
                    page_msg(segment, source.fetch_next_page().await, &*source, |page| {
                        Msg::PageLoaded { segment, page }
                    })
                });
            }
            Effect::ChangeOrder { segment, order } => {
                let source = self.page_source(segment);
                self.spawn_request(async move {
                    page_msg(segment, source.set_order(order).await, &*source, |page| {
                        Msg::FirstPageReloaded { segment, page }
                    })
                });
            }
            Effect::ChangeHighlights {
                segment,
                highlights_only,
            } => {
                let source = self.page_source(segment);
                self.spawn_request(async move {
                    let result = source.set_highlights_only(highlights_only).await;
                    page_msg(segment, result, &*source, |page| Msg::FirstPageReloaded {
                        segment,
                        page,
                    })
                });
            }
            Effect::Reconcile { segment, posts } => {
                self.reconciler.reconcile(segment, &posts);
            }
            Effect::Resync { segment, posts } => {
                self.reconciler.resync(segment, &posts);
            }
            Effect::ClearSegment { segment } => {
                self.reconciler.clear_segment(segment);
            }
            Effect::ResolvePermalink => {
                let resolver = self.collaborators.permalink.clone();
                self.spawn_request(async move {
                    match resolver.resolve_target_id().await {
                        Ok(element_id) => Msg::PermalinkResolved(Some(element_id)),
                        Err(err) => {
                            feed_debug!("No permalink scroll: {}", err);
                            Msg::PermalinkResolved(None)
                        }
                    }
                });
            }
            Effect::ScrollTo { element_id } => {
                self.reconciler.view_mut().scroll_to(&element_id);
            }
            Effect::StartPolling => self.start_polling(),
            Effect::StopPolling => {
                if let Some(scheduler) = &self.scheduler {
                    scheduler.stop();
                }
            }
        }
    }

    fn page_source(&self, segment: Segment) -> Arc<dyn PageSource> {
        self.collaborators.pages.get(segment).clone()
    }

    fn spawn_request<F>(&self, request: F)
    where
        F: std::future::Future<Output = Msg> + Send + 'static,
    {
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let _ = msg_tx.send(request.await);
        });
    }

    fn start_polling(&mut self) {
        if self.scheduler.is_some() {
            return;
        }

        let on_content = {
            let pages = self.collaborators.pages.clone();
            let msg_tx = self.msg_tx.clone();
            move || {
                for segment in Segment::ALL {
                    let source = pages.get(segment).clone();
                    let msg_tx = msg_tx.clone();
                    tokio::spawn(async move {
                        let msg = match source.retrieve_update().await {
                            Ok(posts) => {
                                source.record_latest_seen(&posts);
                                Msg::UpdatesFetched { segment, posts }
                            }
                            Err(err) => Msg::UpdatesFailed {
                                segment,
                                reason: err.to_string(),
                            },
                        };
                        let _ = msg_tx.send(msg);
                    });
                }
            }
        };

        let on_status = {
            let blog = self.collaborators.blog.clone();
            let msg_tx = self.msg_tx.clone();
            move || {
                let blog = blog.clone();
                let msg_tx = msg_tx.clone();
                tokio::spawn(async move {
                    let msg = match blog.fetch_blog().await {
                        Ok(info) => Msg::BlogFetched(info),
                        Err(err) => Msg::BlogFetchFailed {
                            reason: err.to_string(),
                        },
                    };
                    let _ = msg_tx.send(msg);
                });
            }
        };

        self.scheduler = Some(PollScheduler::start(
            self.update_every,
            on_content,
            on_status,
        ));
    }
}

fn page_msg(
    segment: Segment,
    result: Result<Page, TransportError>,
    source: &dyn PageSource,
    on_page: impl FnOnce(Page) -> Msg,
) -> Msg {
    match result {
        Ok(page) => {
            source.record_latest_seen(&page.items);
            on_page(page)
        }
        Err(err) => Msg::PageFailed {
            segment,
            reason: err.to_string(),
        },
    }
}
