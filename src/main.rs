use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use gheg_srs::data::db::establish_pool;
use gheg_srs::data::models::{LessonContent, ResponseData};
use gheg_srs::{ExerciseType, Settings, SqliteStore, SrsService};

#[derive(Parser)]
#[command(name = "srs", about = "Spaced repetition scheduler for Gheg Albanian vocabulary", version)]
struct Cli {
    /// SQLite database path (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the scheduler tables
    InitDb,
    /// Add or update a vocabulary item
    AddContent {
        id: String,
        english: String,
        target: String,
        #[arg(long, default_value_t = 5.0)]
        difficulty: f64,
        #[arg(long)]
        pronunciation: Option<String>,
        #[arg(long)]
        cultural_context: Option<String>,
    },
    /// Start tracking items for a learner
    Init {
        user: String,
        content_ids: Vec<String>,
    },
    /// Record a response (quality 0-5)
    Review {
        user: String,
        content: String,
        quality: i32,
        /// Response time in seconds
        #[arg(long)]
        time: Option<f64>,
        #[arg(long, default_value = "flashcard")]
        exercise: String,
    },
    /// Show the ranked review queue
    Queue {
        user: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show scheduling statistics
    Stats { user: String },
    /// Items due per day
    Upcoming {
        user: String,
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Success rate and ease per difficulty level
    Trends { user: String },
    /// Suggest a difficulty change for an item
    Difficulty { content: String },
    /// Start an item over
    Reset { user: String, content: String },
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let settings = Settings::from_env();

    let cli = Cli::parse();
    let database_url = cli.database.unwrap_or(settings.database_url);

    let pool = establish_pool(&database_url, settings.pool_size)
        .with_context(|| format!("Failed to open database {}", database_url))?;
    let mut conn = pool.get().context("Failed to get DB connection")?;
    let mut service = SrsService::new(SqliteStore::new(&mut conn));

    match cli.command {
        Command::InitDb => {
            println!("Database ready at {}", database_url);
        }
        Command::AddContent {
            id,
            english,
            target,
            difficulty,
            pronunciation,
            cultural_context,
        } => {
            let content = LessonContent {
                id,
                english_phrase: english,
                target_phrase: target,
                pronunciation_guide: pronunciation,
                cultural_context,
                difficulty_score: difficulty,
            };
            service.store_mut().save_content(&content)?;
            print_json(&content)?;
        }
        Command::Init { user, content_ids } => {
            let ids: Vec<&str> = content_ids.iter().map(String::as_str).collect();
            let created = service.initialize_content(&user, &ids)?;
            println!("Initialized {} new items for {}", created, user);
        }
        Command::Review {
            user,
            content,
            quality,
            time,
            exercise,
        } => {
            let response = ResponseData {
                quality,
                time,
                exercise_type: exercise.parse::<ExerciseType>()?,
            };
            let outcome = service.process_user_response(&user, &content, &response)?;
            print_json(&outcome)?;
        }
        Command::Queue { user, limit } => {
            let queue = service.get_review_queue(&user, limit.unwrap_or(settings.queue_limit))?;
            print_json(&queue)?;
        }
        Command::Stats { user } => {
            let stats = service.get_stats(&user)?;
            print_json(&stats)?;
        }
        Command::Upcoming { user, days } => {
            let upcoming = service.upcoming_reviews(&user, days)?;
            print_json(&upcoming)?;
        }
        Command::Trends { user } => {
            let trends = service.performance_trends(&user)?;
            print_json(&trends)?;
        }
        Command::Difficulty { content } => {
            let adjustment = service.get_difficulty_adjustment(&content)?;
            print_json(&adjustment)?;
        }
        Command::Reset { user, content } => {
            match service.reset_item(&user, &content)? {
                Some(record) => print_json(&record)?,
                None => anyhow::bail!("{} has no record for {}", user, content),
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
