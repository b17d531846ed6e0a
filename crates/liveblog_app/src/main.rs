//! Terminal front end for the liveblog widget.
//!
//! Usage: `liveblog_app <config.ron>`. The feed is read from a local JSON
//! file; type `status` for the widget flags and `quit` to leave.

mod commands;
mod config;
mod feed_file;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use feed_logging::{feed_debug, feed_info};
use liveblog_core::{Segment, Segments};
use liveblog_engine::{
    BlogSource, Collaborators, FetchSettings, NoPermalink, PageSource, ReqwestBlogSource,
    StaticBlogSource, WidgetConfig, WidgetHandle,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{status_line, Command};
use crate::config::AppConfig;
use crate::feed_file::FilePageSource;
use crate::terminal::TerminalTimeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: liveblog_app <config.ron>")?;
    let config = AppConfig::load(&path)?;
    feed_logging::initialize(&config.log);
    feed_info!("Starting widget for {}", config.feed_file.display());

    let collaborators = collaborators(&config)?;
    let widget = liveblog_engine::spawn(
        WidgetConfig::new(config.settings.clone(), config.blog.clone()),
        collaborators,
        TerminalTimeline::new(std::io::stdout()),
    );
    watch_status(&widget);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Ok(command) => {
                if !command.run(&widget) {
                    break;
                }
            }
            Err(err) => eprintln!("{err}"),
        }
    }

    widget.shutdown().await;
    feed_info!("Bye");
    Ok(())
}

fn collaborators(config: &AppConfig) -> anyhow::Result<Collaborators> {
    let page_source = |segment: Segment| -> Arc<dyn PageSource> {
        Arc::new(FilePageSource::new(
            config.feed_file.clone(),
            segment,
            config.settings.page_size(segment),
            config.settings.post_order,
        ))
    };

    let blog: Arc<dyn BlogSource> = match &config.blog_url {
        Some(url) => Arc::new(
            ReqwestBlogSource::new(url, FetchSettings::default())
                .with_context(|| format!("blog status url {url}"))?,
        ),
        None => Arc::new(StaticBlogSource::new(config.blog.clone())),
    };

    Ok(Collaborators {
        pages: Segments::new(page_source(Segment::Primary), page_source(Segment::Sticky)),
        blog,
        permalink: Arc::new(NoPermalink),
    })
}

/// Print the status line whenever pending counts or the feed status change.
fn watch_status(widget: &WidgetHandle) {
    let mut rx = widget.subscribe();
    tokio::spawn(async move {
        let mut last = rx.borrow().clone();
        while rx.changed().await.is_ok() {
            let current = rx.borrow_and_update().clone();
            let noteworthy = current.pending_batches != last.pending_batches
                || current.pending_posts != last.pending_posts
                || current.pending_sticky_posts != last.pending_sticky_posts
                || current.blog_status != last.blog_status
                || current.finished != last.finished;
            if noteworthy {
                println!("{}", status_line(&current));
            }
            last = current;
        }
        feed_debug!("Status watcher stopped");
    });
}
