// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use url::Url;

use podplay::{
    Config, Episode, EpisodeLoader, Locale, MediaDirective, MediaEvent, PlayerObserver,
    PlayerState, PlayerStore, ReqwestClient, handle_media_event,
};

// Emoji with fallback for terminals without Unicode support
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static PLAY: Emoji<'_, '_> = Emoji("▶️  ", "> ");
static PAUSE: Emoji<'_, '_> = Emoji("⏸️  ", "|| ");
static SHUFFLE: Emoji<'_, '_> = Emoji("🔀 ", "[s] ");
static LOOP: Emoji<'_, '_> = Emoji("🔁 ", "[l] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");

const DESCRIPTION_WIDTH: usize = 80;

/// Browse podcast episodes and drive a playlist from the terminal
#[derive(Parser, Debug)]
#[command(name = "podplay")]
#[command(about = "Browse podcast episodes and drive a playlist from the terminal")]
#[command(version)]
struct Args {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the episodes API (overrides the config file)
    #[arg(long, global = true)]
    api: Option<Url>,

    /// Locale for publish dates, pt-BR or en-US (overrides the config file)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the details of one episode
    Show {
        /// Episode identifier
        id: String,
    },

    /// List the most recent episodes
    Latest {
        /// Number of episodes to list
        #[arg(short = 'n', long, default_value = "12")]
        limit: usize,
    },

    /// Load episodes into a playlist and control it from stdin
    Listen {
        /// Episode identifiers, in playback order
        #[arg(required = true)]
        ids: Vec<String>,

        /// Position in the playlist to start at
        #[arg(short, long, default_value = "0")]
        start: usize,

        /// Start with shuffle enabled
        #[arg(long)]
        shuffle: bool,

        /// Start with loop enabled
        #[arg(long = "loop")]
        looping: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "podplay=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn spinner(message: String) -> Result<ProgressBar> {
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {wide_msg}")
        .context("Invalid spinner template")?;

    let bar = ProgressBar::new_spinner();
    bar.set_style(style);
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    Ok(bar)
}

fn print_episode(episode: &Episode) {
    println!("\n{HEADPHONES}{}", episode.title.bold().green());
    println!(
        "   {} • {} • {}",
        episode.members.cyan(),
        episode.published_at.yellow(),
        episode.duration_as_string.yellow()
    );
    println!("\n{}\n", episode.plain_description(DESCRIPTION_WIDTH));
    println!("   {}", episode.url.to_string().dimmed());
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let kept: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn render_state(state: &PlayerState) -> String {
    let Some(current) = state.current_episode() else {
        return "Nothing queued".dimmed().to_string();
    };

    let icon = if state.is_playing { &PLAY } else { &PAUSE };
    let mut line = format!(
        "{icon}[{}/{}] {} ({})",
        (state.current_episode_index + 1).to_string().cyan(),
        state.episode_list.len().to_string().cyan(),
        truncate_title(&current.title, 50).bold(),
        current.duration_as_string
    );

    if state.is_shuffling {
        line.push_str(&format!(" {SHUFFLE}"));
    }
    if state.is_looping {
        line.push_str(&format!(" {LOOP}"));
    }
    let previous = if state.has_previous() { "prev " } else { "" };
    let next = if state.has_next() { "next" } else { "" };
    line.push_str(&format!("  {}{}", previous.dimmed(), next.dimmed()));
    line
}

/// Prints the player line whenever the state changes
struct StatusPrinter;

impl PlayerObserver for StatusPrinter {
    fn state_changed(&self, state: &PlayerState) {
        println!("{}", render_state(state));
    }
}

/// Parse the 1-based position given to `jump` into a playlist index
fn jump_target(word: Option<&str>) -> Option<usize> {
    word?.parse::<usize>().ok()?.checked_sub(1)
}

const LISTEN_HELP: &str =
    "commands: next, prev, toggle, pause, resume, ended, shuffle, loop, jump <n>, clear, status, quit";

async fn listen(mut store: PlayerStore, episodes: Vec<Episode>, start: usize) -> Result<()> {
    store.subscribe(Arc::new(StatusPrinter));
    store
        .play_list(episodes, start)
        .context("Failed to start playlist")?;

    println!("{}", LISTEN_HELP.dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("next" | "n") => store.play_next(),
            Some("prev" | "p") => store.play_previous(),
            Some("toggle" | "t") => store.toggle_play(),
            Some("shuffle") => store.toggle_shuffle(),
            Some("loop") => store.toggle_loop(),
            Some("clear") => store.clear_player_state(),
            Some("status") => println!("{}", render_state(store.state())),
            Some("pause") => {
                handle_media_event(&mut store, MediaEvent::Paused);
            }
            Some("resume") => {
                handle_media_event(&mut store, MediaEvent::Played);
            }
            Some("ended") => match handle_media_event(&mut store, MediaEvent::Ended) {
                MediaDirective::Restart => println!("{}", "Restarting episode".dimmed()),
                MediaDirective::Load(url) => println!("{}", url.to_string().dimmed()),
                MediaDirective::Stop => println!("{}", "Playlist finished".dimmed()),
                MediaDirective::Continue => {}
            },
            Some("jump") => {
                match jump_target(words.next()) {
                    Some(index) => {
                        let list = store.state().episode_list.clone();
                        if let Err(e) = store.play_list(list, index) {
                            println!("{FAILURE}{}", e.to_string().red());
                        }
                    }
                    None => println!("{FAILURE}{}", "usage: jump <n>".red()),
                }
            }
            Some("quit" | "q") => break,
            Some(other) => println!("{FAILURE}unknown command '{}'\n{}", other, LISTEN_HELP.dimmed()),
            None => {}
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config =
        Config::load_or_default(args.config.as_deref()).context("Failed to load config")?;
    if let Some(api) = args.api {
        config.api_base_url = api;
    }
    if let Some(locale) = args.locale {
        config.locale = locale;
    }

    let loader = EpisodeLoader::from_config(ReqwestClient::new(), &config);

    match args.command {
        Command::Show { id } => {
            let bar = spinner(format!("Fetching episode {}", id.cyan()))?;
            let loaded = loader.load_episode(&id).await;
            bar.finish_and_clear();
            let loaded = loaded.with_context(|| format!("Failed to load episode {id}"))?;
            print_episode(&loaded.episode);
        }

        Command::Latest { limit } => {
            let bar = spinner("Fetching latest episodes".to_string())?;
            let episodes = loader.load_latest(limit).await;
            bar.finish_and_clear();
            let episodes = episodes.context("Failed to load latest episodes")?;

            for episode in &episodes {
                println!(
                    "{} {} {} {}",
                    episode.published_at.yellow(),
                    episode.duration_as_string.dimmed(),
                    truncate_title(&episode.title, 60).bold(),
                    format!("({})", episode.id).dimmed()
                );
            }
        }

        Command::Listen {
            ids,
            start,
            shuffle,
            looping,
        } => {
            let bar = spinner(format!("Fetching {} episodes", ids.len()))?;
            let episodes = loader.load_many(&ids).await;
            bar.finish_and_clear();
            let episodes = episodes.context("Failed to load playlist")?;

            let mut store = PlayerStore::new();
            if shuffle {
                store.toggle_shuffle();
            }
            if looping {
                store.toggle_loop();
            }
            listen(store, episodes, start).await?;
        }
    }

    Ok(())
}
