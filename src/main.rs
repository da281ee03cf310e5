use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use review_scheduler::config::Settings;
use review_scheduler::database::SqliteStore;
use review_scheduler::export::json::{export_snapshot_to_path, import_catalog, import_snapshot};
use review_scheduler::logging::init_tracing;
use review_scheduler::store::{persist, restore};
use review_scheduler::{Catalog, ManualClock, ReviewSession, Scheduler};

#[derive(Parser)]
#[command(name = "review", version, about = "Spaced repetition review scheduler")]
struct Cli {
    /// Settings file, layered over the defaults and the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Whose progress to use (defaults to the configured user)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Treat this RFC 3339 instant as the current time
    #[arg(long, global = true)]
    at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the review queue, most urgent first
    Due {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the item at the head of the queue
    Next,
    /// Answer the head of the queue, or a specific item with --item
    Answer {
        response: String,
        #[arg(long)]
        item: Option<String>,
    },
    /// Overall statistics
    Stats,
    /// Statistics per topic
    Topics,
    /// Write the stored progress to a JSON file
    Export { path: PathBuf },
    /// Replace the stored progress with a JSON file
    Import { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    init_tracing(&settings.log_level);

    let user_id = cli.user.clone().unwrap_or_else(|| settings.user_id.clone());
    let catalog = match &settings.catalog_path {
        Some(path) => import_catalog(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::sample(),
    };
    let store = SqliteStore::open(&settings.database_path).with_context(|| {
        format!("Failed to open database {}", settings.database_path.display())
    })?;

    let mut scheduler = Scheduler::with_clock(ManualClock::new(cli.at.unwrap_or_else(Utc::now)));
    restore(&mut scheduler, &store, &user_id).context("Failed to restore progress")?;

    match cli.command {
        Command::Due { limit } => {
            let limit = limit.unwrap_or(settings.queue_limit);
            let queue = scheduler.get_due_questions(&catalog.item_ids(), limit)?;
            let now = scheduler.now();
            for item_id in &queue {
                let marker = match scheduler.record(item_id) {
                    Some(record) if record.is_due(now) => "due".to_string(),
                    Some(record) => format!("at {}", record.next_review.format("%Y-%m-%d %H:%M")),
                    None => String::new(),
                };
                println!("{item_id}\t{marker}");
            }
        }
        Command::Next => {
            let session = ReviewSession::new(&mut scheduler, &catalog, settings.queue_limit)?;
            let summary = session.summary();
            match (session.current_id(), session.current()) {
                (Some(item_id), Some((topic, item))) => {
                    println!("[{}] {}", topic.name, item.prompt);
                    println!("id: {item_id}");
                    println!(
                        "{} questions in queue ({} due now)",
                        summary.queued, summary.due_now
                    );
                }
                _ => println!("No questions due for review! Check back later."),
            }
        }
        Command::Answer { response, item } => {
            let (item_id, is_correct, expected, explanation) = match item {
                Some(item_id) => {
                    let is_correct = catalog.check_answer(&item_id, &response)?;
                    scheduler.record_answer(&item_id, is_correct)?;
                    let (_, entry) = catalog
                        .item(&item_id)
                        .with_context(|| format!("Item not found in catalog: {item_id}"))?;
                    (item_id, is_correct, entry.answer.clone(), entry.explanation.clone())
                }
                None => {
                    let mut session =
                        ReviewSession::new(&mut scheduler, &catalog, settings.queue_limit)?;
                    let outcome = session.submit(&response)?;
                    (outcome.item_id, outcome.is_correct, outcome.expected, outcome.explanation)
                }
            };

            if is_correct {
                println!("✔ Correct!");
            } else {
                println!("✘ Not quite. The correct answer is '{expected}'.");
            }
            if let Some(explanation) = explanation {
                println!("{explanation}");
            }
            if let Some(record) = scheduler.record(&item_id) {
                println!("Next review of {item_id}: {}", record.next_review.to_rfc3339());
            }
            persist(&scheduler, &store, &user_id).context("Failed to save progress")?;
        }
        Command::Stats => {
            let stats = scheduler.get_stats();
            println!("Total Reviews: {}", stats.stats.total_reviews);
            println!("Correct: {}", stats.stats.total_correct);
            println!("Incorrect: {}", stats.stats.total_incorrect);
            println!("Accuracy: {:.1}%", stats.accuracy);
            println!("Current Streak: {}", stats.stats.streak);
            println!("Best Streak: {}", stats.stats.best_streak);
        }
        Command::Topics => {
            for (topic, stats) in scheduler.get_topic_stats() {
                if stats.total > 0 {
                    println!(
                        "{topic}: {}/{} ({:.0}%)",
                        stats.correct, stats.total, stats.accuracy
                    );
                }
            }
        }
        Command::Export { path } => {
            export_snapshot_to_path(&scheduler.export(), &path)
                .with_context(|| format!("Failed to export to {}", path.display()))?;
            println!("Progress for '{user_id}' exported to '{}'", path.display());
        }
        Command::Import { path } => {
            let value = import_snapshot(&path)
                .with_context(|| format!("Failed to import from {}", path.display()))?;
            scheduler.import_value(&value);
            persist(&scheduler, &store, &user_id).context("Failed to save progress")?;
            println!(
                "Imported {} review records for '{user_id}' from '{}'",
                scheduler.len(),
                path.display()
            );
        }
    }

    Ok(())
}
