use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use feed_logging::{feed_error, feed_warn};
use riddle_core::{default_thumbnail, resolve_field, Feed, FieldValue, MediaField};
use riddle_engine::{localize_thumbnail, Clock, FeedService, Fetcher, FileCacheStore};

use crate::logging::LogDestination;
use crate::persistence::{cache_dir, load_settings, save_settings, AppSettings};

#[derive(Debug, Parser)]
#[command(name = "riddle", about = "Browse and resolve riddles from the Riddle feed")]
pub struct Cli {
    /// RON settings file.
    #[arg(long, env = "RIDDLE_SETTINGS", default_value = "riddle_settings.ron")]
    pub settings: PathBuf,

    /// Overrides the token from the settings file.
    #[arg(long, env = "RIDDLE_TOKEN")]
    pub token: Option<String>,

    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,

    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every riddle in the feed.
    Feed,
    /// Print one media field of a riddle.
    Lookup {
        code: String,
        /// id, title, status, thumbnail or thumbnail_local_uri
        field: MediaField,
    },
    /// Print the local thumbnail of a riddle, downloading it when needed.
    Thumbnail { code: String },
    /// Update and save the settings file.
    Configure {
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        fetch_unpublished: Option<bool>,
        #[arg(long)]
        empty_title_prefix: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The feed could not be loaded; fallback output was printed.
    FeedUnavailable,
}

pub fn run(
    cli: &Cli,
    fetcher: Arc<dyn Fetcher>,
    clock: Arc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let mut settings = load_settings(&cli.settings)?;

    if let Command::Configure {
        token,
        fetch_unpublished,
        empty_title_prefix,
    } = &cli.command
    {
        return configure(
            cli,
            settings,
            token.clone(),
            *fetch_unpublished,
            empty_title_prefix.clone(),
            out,
        );
    }

    if let Some(token) = &cli.token {
        settings.feed.token = Some(token.clone());
    }
    let service = FeedService::new(
        settings.feed.clone(),
        fetcher.clone(),
        clock,
        Arc::new(FileCacheStore::new(cache_dir(&cli.settings))),
    );

    match &cli.command {
        Command::Feed => {
            let feed = match service.get_feed() {
                Ok(feed) => feed,
                Err(err) => {
                    feed_error!("Feed unavailable: {}", err);
                    return Ok(Outcome::FeedUnavailable);
                }
            };
            for entry in feed.iter() {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    entry.uid,
                    entry.status.as_flag(),
                    entry.title,
                    entry.image.as_deref().unwrap_or("-")
                )?;
            }
            Ok(Outcome::Success)
        }
        Command::Lookup { code, field } => {
            // Ids resolve from the code alone.
            let (feed, outcome) = if *field == MediaField::Id {
                (Arc::new(Feed::new()), Outcome::Success)
            } else {
                feed_or_empty(&service)
            };
            if let Some(value) = resolve_field(&feed, code, *field, &settings.media) {
                writeln!(out, "{value}")?;
            }
            Ok(outcome)
        }
        Command::Thumbnail { code } => {
            let (feed, outcome) = feed_or_empty(&service);
            let local = match localize_thumbnail(fetcher.as_ref(), &feed, code, &settings.media) {
                Ok(local) => local,
                Err(err) => {
                    feed_warn!("Thumbnail for {} unavailable: {}", code, err);
                    None
                }
            };
            let path = local.unwrap_or_else(|| default_thumbnail(&settings.media));
            writeln!(out, "{}", FieldValue::Path(path))?;
            Ok(outcome)
        }
        Command::Configure { .. } => Ok(Outcome::Success),
    }
}

/// A failed feed lookup degrades to an empty feed so callers render a fallback.
fn feed_or_empty(service: &FeedService) -> (Arc<Feed>, Outcome) {
    match service.get_feed() {
        Ok(feed) => (feed, Outcome::Success),
        Err(err) => {
            feed_error!("Feed unavailable: {}", err);
            (Arc::new(Feed::new()), Outcome::FeedUnavailable)
        }
    }
}

fn configure(
    cli: &Cli,
    mut settings: AppSettings,
    token: Option<String>,
    fetch_unpublished: Option<bool>,
    empty_title_prefix: Option<String>,
    out: &mut dyn Write,
) -> Result<Outcome> {
    if let Some(token) = token {
        settings.feed.token = Some(token).filter(|t| !t.trim().is_empty());
    }
    if let Some(fetch_unpublished) = fetch_unpublished {
        settings.feed.fetch_unpublished = fetch_unpublished;
    }
    if let Some(prefix) = empty_title_prefix {
        settings.feed.empty_title_prefix = prefix;
    }

    let written = save_settings(&cli.settings, &settings)?;
    writeln!(out, "saved {}", written.display())?;
    Ok(Outcome::Success)
}
