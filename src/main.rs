// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DisplayCase command-line client.
//!
//! Drives the same store a UI would, against the API in DISPLAYCASE_API_URL.
//! The session persists between invocations.

use anyhow::Context;
use clap::{Parser, Subcommand};
use displaycase_client::config::{Config, LogFormat};
use displaycase_client::models::{GameStatus, NewGameEntry};
use displaycase_client::services::GameEntryFilter;
use displaycase_client::{AppError, Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "displaycase", version, about = "Track the games you play")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DISPLAYCASE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List game entries grouped by status
    Entries {
        /// Only entries of this user (defaults to yourself)
        #[arg(long)]
        user_id: Option<u64>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Add a game to your library
    Add {
        game_id: u64,
        #[arg(long, default_value = "BACKLOG")]
        status: GameStatus,
        #[arg(long)]
        rating: Option<f64>,
    },
    /// Change the status of an entry
    Status { entry_id: u64, status: GameStatus },
    /// Remove an entry from your library
    Remove { entry_id: u64 },
    /// Show a user's statistics
    Stats { username: String },
    /// Show the activity of people you follow
    Timeline {
        #[arg(long)]
        page: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_logging(config.log_format)?;
    tracing::debug!(api_url = %config.api_url, "Starting DisplayCase client");

    let store = Store::from_config(&config).context("Failed to initialize client")?;

    if let Err(e) = run(&store, cli.command).await {
        let note = e.notification();
        eprintln!("{}: {}", note.title, note.message);
        tracing::debug!(error = %e, kind = %e.kind(), "Command failed");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(store: &Store, command: Command) -> Result<(), AppError> {
    match command {
        Command::Login { email, password } => {
            let user = store.login(&email, &password).await?;
            println!("Logged in as {}", user.username);
        }
        Command::Logout => {
            store.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => match store.restore().await? {
            Some(user) => {
                println!("{} (id {})", user.username, user.id);
                if let Some(bio) = user.bio.filter(|b| !b.is_empty()) {
                    println!("  {}", bio);
                }
                for badge in user.badges {
                    println!("  🏅 {}", badge.name);
                }
            }
            None => println!("Not logged in"),
        },
        Command::Entries { user_id, page } => {
            let user_id = match user_id {
                Some(id) => id,
                None => store
                    .restore()
                    .await?
                    .map(|u| u.id)
                    .ok_or(AppError::Unauthorized)?,
            };
            let filter = GameEntryFilter {
                page,
                ..GameEntryFilter::for_user(user_id)
            };
            let result = store.fetch_game_entries(&filter).await?;
            for (status, entries) in store.entries_by_status().iter() {
                if entries.is_empty() {
                    continue;
                }
                println!("{} ({})", status, entries.len());
                for entry in entries {
                    let rating = entry
                        .rating
                        .map(|r| format!(" ★{}", r))
                        .unwrap_or_default();
                    println!("  [{}] {}{}", entry.id, entry.game_name, rating);
                }
            }
            println!("page {} of {}", page.unwrap_or(1), result.pages);
        }
        Command::Add {
            game_id,
            status,
            rating,
        } => {
            let mut entry = NewGameEntry::new(game_id, status);
            entry.rating = rating;
            if status == GameStatus::Playing {
                entry.time_started = Some(chrono::Utc::now().date_naive());
            }
            let created = store.create_game_entry(&entry).await?;
            println!("Added {} as {} (entry {})", created.game_name, created.status, created.id);
        }
        Command::Status { entry_id, status } => {
            let mut entry = store.fetch_game_entry(entry_id).await?;
            entry.status = status;
            if status == GameStatus::Completed && entry.time_completed.is_none() {
                entry.time_completed = Some(chrono::Utc::now().date_naive());
            }
            let updated = store.update_game_entry(entry).await?;
            println!("{} is now {}", updated.game_name, updated.status);
        }
        Command::Remove { entry_id } => {
            store.delete_game_entry(entry_id).await?;
            println!("Removed entry {}", entry_id);
        }
        Command::Stats { username } => {
            let stats = store.fetch_statistics(&username).await?;
            println!("{}: {} games", username, stats.total_games());
            if let Some(avg) = stats.average_rating {
                println!("  average rating {:.1}", avg);
            }
            for (status, count) in &stats.game_status_distribution {
                println!("  {:<10} {}", status, count);
            }
            if let Some(genre) = stats.top_genre() {
                println!("  favourite genre: {}", genre);
            }
            if let Some(platform) = stats.top_platform() {
                println!("  most played on: {}", platform);
            }
        }
        Command::Timeline { page } => {
            let feed = store.timeline(page).await?;
            for activity in feed.items {
                let detail = activity
                    .status
                    .map(|s| s.to_string())
                    .unwrap_or(activity.activity_type);
                println!(
                    "{}  {} — {} ({})",
                    activity.timestamp.format("%Y-%m-%d"),
                    activity.username,
                    activity.game_name,
                    detail
                );
            }
        }
    }
    Ok(())
}

/// Initialize logging on stderr, JSON or human-readable.
fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn").add_directive("displaycase_client=info".parse()?),
    };

    let json = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let pretty = (format == LogFormat::Pretty).then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .init();
    Ok(())
}
