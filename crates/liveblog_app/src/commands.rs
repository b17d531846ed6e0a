use anyhow::{anyhow, bail};
use liveblog_core::{PostOrder, WidgetViewModel};
use liveblog_engine::{WidgetHandle, LOAD_MORE_SIGNAL};

/// One line typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    More,
    /// Simulates the host page posting the load-more message.
    Signal,
    Order(PostOrder),
    Highlights,
    Sticky,
    Apply,
    Status,
    Quit,
}

impl Command {
    pub(crate) fn parse(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next().unwrap_or_default() {
            "more" => Command::More,
            "signal" => Command::Signal,
            "order" => {
                let raw = words.next().ok_or_else(|| anyhow!("order needs a value"))?;
                let order = PostOrder::parse(raw).ok_or_else(|| {
                    anyhow!("unknown order {raw:?}, expected one of {}", order_names())
                })?;
                Command::Order(order)
            }
            "highlights" => Command::Highlights,
            "sticky" => Command::Sticky,
            "apply" => Command::Apply,
            "status" => Command::Status,
            "quit" | "exit" => Command::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command {other:?}"),
        };
        if let Some(extra) = words.next() {
            bail!("unexpected argument {extra:?}");
        }
        Ok(command)
    }

    /// Forward to the widget. Returns false when the app should exit.
    pub(crate) fn run(self, widget: &WidgetHandle) -> bool {
        match self {
            Command::More => widget.load_more(),
            Command::Signal => {
                widget.post_message(LOAD_MORE_SIGNAL);
            }
            Command::Order(order) => widget.set_order(order),
            Command::Highlights => widget.toggle_highlights(),
            Command::Sticky => widget.toggle_sticky(),
            Command::Apply => widget.apply_pending(),
            Command::Status => println!("{}", status_line(&widget.view_model())),
            Command::Quit => return false,
        }
        true
    }
}

fn order_names() -> String {
    PostOrder::ALL
        .iter()
        .map(|order| order.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn status_line(view: &WidgetViewModel) -> String {
    let mut line = format!(
        "{} posts | {} | feed {:?} | polling {:?}",
        view.timeline_events,
        view.order.label(),
        view.blog_status,
        view.polling,
    );
    if view.highlights_only {
        line.push_str(" | highlights only");
    }
    if !view.sticky_visible {
        line.push_str(" | sticky hidden");
    }
    if view.loading {
        line.push_str(" | loading");
    } else if view.finished {
        line.push_str(" | end of feed");
    }
    if view.has_pending() {
        line.push_str(&format!(
            " | {} new posts, {} new pinned (type apply)",
            view.pending_posts, view.pending_sticky_posts
        ));
    }
    line
}
