use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use vocab_core::scheduling::AlgorithmType;
use vocab_core::survey::{PriorAnswer, PriorQuestionDetails};
use vocab_core::vocab_store::VocabularyStore;
use vocab_storage::{
    SqliteAssignmentRepository, SqliteCardRepository, SqliteEconomyRepository,
    SqliteSurveyRepository,
};

mod assignment;
mod economy;
mod review;
mod survey;

/// vocab CLI - inspection and operator tool for the vocabulary learning core
#[derive(Parser)]
#[command(name = "vocab")]
#[command(about = "vocab CLI tool for testing and operating the learning core", long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, default_value = "vocab.db")]
    db: String,

    /// Path to the packaged vocabulary snapshot (required for survey commands)
    #[arg(long)]
    snapshot: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spaced-repetition review commands
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },
    /// Currency and level economy commands
    Economy {
        #[command(subcommand)]
        command: EconomyCommands,
    },
    /// Adaptive survey commands
    Survey {
        #[command(subcommand)]
        command: SurveyCommands,
    },
    /// SM-2+/FSRS algorithm assignment commands
    Assignment {
        #[command(subcommand)]
        command: AssignmentCommands,
    },
}

#[derive(Subcommand)]
enum ReviewCommands {
    /// List cards due for review
    Due {
        user_id: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Submit a review outcome for a card
    Submit {
        user_id: String,
        learning_progress_id: i64,
        /// 0=Again 1=Hard 2=Good 3=Easy 4=Perfect
        rating: u8,
        #[arg(long)]
        response_time_ms: Option<u32>,
    },
    /// Create a new card for a user
    New {
        user_id: String,
        learning_progress_id: i64,
        learning_point_id: String,
        /// sm2_plus or fsrs
        #[arg(long, default_value = "sm2_plus")]
        algorithm: String,
    },
}

#[derive(Subcommand)]
enum EconomyCommands {
    /// Show a user's currency balances and level
    Balances { user_id: String },
    /// Grant sparks (XP) to a user
    GrantSparks {
        user_id: String,
        amount: i64,
        #[arg(long, default_value = "manual_grant")]
        reason: String,
    },
    /// Spend currency from a user's balances
    Spend {
        user_id: String,
        #[arg(long, default_value_t = 0)]
        energy: i64,
        #[arg(long, default_value_t = 0)]
        essence: i64,
        #[arg(long, default_value_t = 0)]
        blocks: i64,
    },
}

#[derive(Subcommand)]
enum SurveyCommands {
    /// Advance (or start) an adaptive survey session
    Step {
        user_id: String,
        #[arg(long)]
        session_id: Option<String>,
        /// JSON-encoded PriorAnswer
        #[arg(long)]
        prior_answer: Option<String>,
        /// JSON-encoded PriorQuestionDetails
        #[arg(long)]
        prior_question: Option<String>,
    },
}

#[derive(Subcommand)]
enum AssignmentCommands {
    /// Get (or randomly assign) a user's algorithm
    GetOrAssign { user_id: String },
    /// Manually set a user's algorithm
    Set {
        user_id: String,
        /// sm2_plus or fsrs
        algorithm: String,
    },
    /// Migrate a user from SM-2+ to FSRS
    Migrate {
        user_id: String,
        #[arg(long)]
        force: bool,
    },
    /// Show assignment statistics across all users
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let pool = vocab_storage::init_db(&cli.db).await?;

    match cli.command {
        Commands::Review { command } => run_review(command, pool).await?,
        Commands::Economy { command } => run_economy(command, pool).await?,
        Commands::Survey { command } => run_survey(command, pool, cli.snapshot.as_deref()).await?,
        Commands::Assignment { command } => run_assignment(command, pool).await?,
    }

    Ok(())
}

async fn run_review(command: ReviewCommands, pool: SqlitePool) -> Result<()> {
    let repo = SqliteCardRepository::new(pool);
    match command {
        ReviewCommands::Due { user_id, limit } => review::due(repo, &user_id, limit).await,
        ReviewCommands::Submit {
            user_id,
            learning_progress_id,
            rating,
            response_time_ms,
        } => {
            review::submit(
                repo,
                &user_id,
                learning_progress_id,
                rating,
                response_time_ms,
            )
            .await
        }
        ReviewCommands::New {
            user_id,
            learning_progress_id,
            learning_point_id,
            algorithm,
        } => {
            let algorithm: AlgorithmType = algorithm
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            review::new_card(
                repo,
                &user_id,
                learning_progress_id,
                &learning_point_id,
                algorithm,
            )
            .await
        }
    }
}

async fn run_economy(command: EconomyCommands, pool: SqlitePool) -> Result<()> {
    let repo = SqliteEconomyRepository::new(pool);
    match command {
        EconomyCommands::Balances { user_id } => economy::balances(repo, &user_id).await,
        EconomyCommands::GrantSparks {
            user_id,
            amount,
            reason,
        } => economy::grant_sparks(repo, &user_id, amount, &reason).await,
        EconomyCommands::Spend {
            user_id,
            energy,
            essence,
            blocks,
        } => economy::spend(repo, &user_id, energy, essence, blocks).await,
    }
}

async fn run_survey(command: SurveyCommands, pool: SqlitePool, snapshot: Option<&str>) -> Result<()> {
    let snapshot_path = snapshot.context("--snapshot is required for survey commands")?;
    let bytes = std::fs::read(snapshot_path)
        .with_context(|| format!("reading snapshot at {snapshot_path}"))?;
    let store = VocabularyStore::load(&bytes, None)?;
    let repo = SqliteSurveyRepository::new(pool);

    match command {
        SurveyCommands::Step {
            user_id,
            session_id,
            prior_answer,
            prior_question,
        } => {
            let prior_answer: Option<PriorAnswer> = prior_answer
                .map(|s| serde_json::from_str(&s))
                .transpose()
                .context("parsing --prior-answer")?;
            let prior_question_details: Option<PriorQuestionDetails> = prior_question
                .map(|s| serde_json::from_str(&s))
                .transpose()
                .context("parsing --prior-question")?;
            survey::step(
                &store,
                repo,
                &user_id,
                session_id.as_deref(),
                prior_answer,
                prior_question_details,
            )
            .await
        }
    }
}

async fn run_assignment(command: AssignmentCommands, pool: SqlitePool) -> Result<()> {
    let repo = SqliteAssignmentRepository::new(pool);
    match command {
        AssignmentCommands::GetOrAssign { user_id } => {
            assignment::get_or_assign(repo, &user_id).await
        }
        AssignmentCommands::Set { user_id, algorithm } => {
            let algorithm: AlgorithmType = algorithm
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            assignment::set(repo, &user_id, algorithm).await
        }
        AssignmentCommands::Migrate { user_id, force } => {
            assignment::migrate(repo, &user_id, force).await
        }
        AssignmentCommands::Stats => assignment::stats(repo).await,
    }
}
