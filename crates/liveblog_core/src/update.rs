use feed_logging::{feed_debug, feed_info, feed_warn};

use crate::{Effect, Msg, Segment, UpdatePolicy, WidgetState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: WidgetState, msg: Msg) -> (WidgetState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            state.begin_page_fetch();
            vec![Effect::FetchNextPage {
                segment: Segment::Primary,
            }]
        }
        Msg::LoadMoreSignalled if !state.first_page_loaded() => {
            feed_debug!("Ignoring load-more signal before the first page");
            Vec::new()
        }
        Msg::LoadMoreRequested | Msg::LoadMoreSignalled => {
            if !state.is_allowed_to_load_more() {
                feed_debug!("Load more refused: {:?}", state.mode());
                return (state, Vec::new());
            }
            state.begin_page_fetch();
            vec![Effect::FetchNextPage {
                segment: Segment::Primary,
            }]
        }
        Msg::OrderSelected(order) => {
            state.set_order(order);
            vec![Effect::ChangeOrder {
                segment: Segment::Primary,
                order,
            }]
        }
        Msg::HighlightsToggled => {
            let highlights_only = state.toggle_highlights();
            state.claim_sticky_first_page();
            vec![
                Effect::ChangeHighlights {
                    segment: Segment::Sticky,
                    highlights_only,
                },
                Effect::ChangeHighlights {
                    segment: Segment::Primary,
                    highlights_only,
                },
            ]
        }
        Msg::StickyVisibilityToggled => {
            if state.toggle_sticky_visible() {
                show_sticky(&mut state)
            } else {
                state.drain_pending(Segment::Sticky);
                vec![Effect::ClearSegment {
                    segment: Segment::Sticky,
                }]
            }
        }
        Msg::ApplyPendingClicked => Segment::ALL
            .into_iter()
            .flat_map(|segment| {
                state
                    .drain_pending(segment)
                    .into_iter()
                    .map(move |posts| Effect::Reconcile { segment, posts })
            })
            .collect(),
        Msg::PageLoaded {
            segment: Segment::Primary,
            page,
        } => {
            state.complete_page(&page.meta);
            let mut effects = vec![Effect::Reconcile {
                segment: Segment::Primary,
                posts: page.items,
            }];
            if state.mark_first_page_loaded() {
                effects.extend(first_page_effects(&mut state));
            }
            effects
        }
        Msg::PageLoaded { segment, .. } | Msg::FirstPageReloaded { segment, .. }
            if !state.shows(segment) =>
        {
            feed_debug!("Dropping {:?} page while hidden", segment);
            Vec::new()
        }
        Msg::PageLoaded {
            segment: Segment::Sticky,
            page,
        } => vec![Effect::Reconcile {
            segment: Segment::Sticky,
            posts: page.items,
        }],
        Msg::PageFailed { segment, reason } => {
            feed_warn!("Page fetch for {:?} failed: {}", segment, reason);
            if segment == Segment::Primary {
                state.stop_loading();
            }
            Vec::new()
        }
        Msg::FirstPageReloaded { segment, page } => {
            if segment == Segment::Primary {
                state.complete_page(&page.meta);
            }
            let mut effects = vec![Effect::Resync {
                segment,
                posts: page.items,
            }];
            // A reload can land before any plain page did, e.g. after the
            // first fetch failed.
            if segment == Segment::Primary && state.mark_first_page_loaded() {
                effects.extend(first_page_effects(&mut state));
            }
            effects
        }
        Msg::UpdatesFetched { posts, .. } if posts.is_empty() => Vec::new(),
        Msg::UpdatesFetched { segment, .. } if !state.shows(segment) => {
            feed_debug!("Dropping {:?} updates while hidden", segment);
            Vec::new()
        }
        Msg::UpdatesFetched { segment, posts } => match state.policy(segment) {
            UpdatePolicy::Automatic => vec![Effect::Reconcile { segment, posts }],
            UpdatePolicy::Manual => {
                state.buffer_update(segment, posts);
                Vec::new()
            }
        },
        Msg::UpdatesFailed { segment, reason } => {
            feed_warn!("Update poll for {:?} failed: {}", segment, reason);
            Vec::new()
        }
        Msg::BlogFetched(info) => {
            if state.set_blog_status(info.blog_status) {
                feed_info!("Feed closed, stopping polls");
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::BlogFetchFailed { reason } => {
            feed_warn!("Feed status poll failed: {}", reason);
            Vec::new()
        }
        Msg::PermalinkResolved(target) => {
            state.stop_loading();
            match target {
                Some(element_id) => vec![Effect::ScrollTo { element_id }],
                None => Vec::new(),
            }
        }
    };

    (state, effects)
}

/// Work that follows the first primary page, whichever way it arrived.
fn first_page_effects(state: &mut WidgetState) -> Vec<Effect> {
    let mut effects = Vec::new();
    if state.claim_sticky_first_page() {
        effects.push(Effect::FetchNextPage {
            segment: Segment::Sticky,
        });
    }
    state.begin_page_fetch();
    effects.push(Effect::ResolvePermalink);
    if state.start_polling() {
        effects.push(Effect::StartPolling);
    }
    effects
}

/// Reload the sticky segment's page one under the current filter. Before
/// the first page the regular startup fetch covers it.
fn show_sticky(state: &mut WidgetState) -> Vec<Effect> {
    if !state.first_page_loaded() {
        return Vec::new();
    }
    state.claim_sticky_first_page();
    vec![Effect::ChangeHighlights {
        segment: Segment::Sticky,
        highlights_only: state.mode().highlights_only,
    }]
}
