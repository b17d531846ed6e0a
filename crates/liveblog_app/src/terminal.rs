use std::collections::HashMap;
use std::io::Write;

use feed_logging::feed_warn;
use liveblog_core::{PostId, TimelineEvent, TimelineView, ViewHandle};

/// Prints timeline changes as they happen, one line each.
pub(crate) struct TerminalTimeline<W> {
    out: W,
    next_handle: u64,
    shown: HashMap<ViewHandle, PostId>,
}

impl<W: Write> TerminalTimeline<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            next_handle: 0,
            shown: HashMap::new(),
        }
    }

    fn show(&mut self, event: TimelineEvent) -> ViewHandle {
        self.next_handle += 1;
        let handle = ViewHandle::new(self.next_handle);
        let date = event.display_date.as_deref().unwrap_or("undated");
        self.emit(format_args!("+ [{}] {}: {}", date, event.post_id, event.text));
        self.shown.insert(handle, event.post_id);
        handle
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{line}") {
            feed_warn!("Timeline output failed: {}", err);
        }
    }
}

impl<W: Write> TimelineView for TerminalTimeline<W> {
    fn construct(&mut self, events: Vec<TimelineEvent>) -> Vec<ViewHandle> {
        self.emit(format_args!("== timeline ({} posts)", events.len()));
        events.into_iter().map(|event| self.show(event)).collect()
    }

    fn add(&mut self, event: TimelineEvent) -> ViewHandle {
        self.show(event)
    }

    fn remove_by_handle(&mut self, handle: ViewHandle) {
        match self.shown.remove(&handle) {
            Some(post_id) => self.emit(format_args!("- {post_id}")),
            None => feed_warn!("Unknown timeline handle {}", handle.raw()),
        }
    }

    fn scroll_to(&mut self, element_id: &str) {
        self.emit(format_args!("> {element_id}"));
    }
}
