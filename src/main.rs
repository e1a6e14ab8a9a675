use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedback_desk::api::{self, AppState};
use feedback_desk::client::FeedbackClient;
use feedback_desk::config::{ServerConfig, DEFAULT_PORT};
use feedback_desk::db::Database;
use feedback_desk::form::FeedbackForm;
use feedback_desk::workflow::{FeedbackWorkflow, SubmissionResult};

#[derive(Parser)]
#[command(name = "fbd")]
#[command(about = "Star-rating feedback with AI-generated acknowledgements")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the feedback server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// SQLite file for recorded feedback (defaults to the platform data dir)
        #[arg(long, conflicts_with = "memory")]
        db: Option<PathBuf>,

        /// Keep recorded feedback in memory only
        #[arg(long)]
        memory: bool,
    },
    /// Submit a single review and print the acknowledgement
    Submit {
        /// Star rating, 1-5
        #[arg(short, long)]
        rating: u8,

        /// Review text
        #[arg(short = 'm', long)]
        review: String,

        #[command(flatten)]
        client: ClientArgs,
    },
    /// Fill in the feedback form interactively
    Form {
        #[command(flatten)]
        client: ClientArgs,
    },
    /// Check server status
    Status {
        #[command(flatten)]
        client: ClientArgs,
    },
}

#[derive(clap::Args)]
struct ClientArgs {
    /// Server base URL (overrides FEEDBACK_DESK_URL)
    #[arg(long)]
    url: Option<String>,

    /// Request timeout in seconds (overrides FEEDBACK_DESK_TIMEOUT_SECS)
    #[arg(long)]
    timeout: Option<u64>,
}

impl ClientArgs {
    fn into_client(self) -> FeedbackClient {
        let from_env = FeedbackClient::from_env();
        FeedbackClient::new(
            self.url.unwrap_or_else(|| from_env.base_url().to_string()),
            self.timeout
                .map(Duration::from_secs)
                .unwrap_or_else(|| from_env.timeout()),
        )
    }
}

/// Initialize tracing with output to stderr (for client commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "feedback_desk=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Client mode: keep stdout for the form itself
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(port: u16, db_path: Option<PathBuf>, memory: bool) -> anyhow::Result<()> {
    tracing::info!("Starting feedback server on port {}", port);

    let db = match (db_path, memory) {
        (_, true) => Database::open_memory()?,
        (Some(path), false) => Database::open(path)?,
        (None, false) => Database::open_default()?,
    };
    db.migrate()?;

    let config = ServerConfig::from_env();
    let state = AppState::from_config(&config).with_store(db);
    let app = api::create_router(state, &config);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Feedback server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    match cli.command {
        Some(Commands::Serve { port, db, memory }) => serve(port, db, memory).await?,
        Some(Commands::Submit {
            rating,
            review,
            client,
        }) => {
            let workflow = FeedbackWorkflow::new(client.into_client());
            workflow.set_rating(rating)?;
            workflow.set_review(review)?;

            match workflow.submit().await? {
                SubmissionResult::Succeeded { ai_response } => println!("{}", ai_response),
                SubmissionResult::Failed { reason } => {
                    anyhow::bail!("Failed to submit feedback: {}", reason)
                }
            }
        }
        Some(Commands::Form { client }) => {
            let workflow = FeedbackWorkflow::new(client.into_client());
            let stdin = std::io::stdin();
            let mut form = FeedbackForm::new(workflow, stdin.lock(), std::io::stdout());
            form.run().await?;
        }
        Some(Commands::Status { client }) => {
            let client = client.into_client();
            println!("Checking feedback server at {}...", client.base_url());
            match client.health().await {
                Ok(true) => println!("Server is up"),
                Ok(false) => anyhow::bail!("Server answered but is not healthy"),
                Err(e) => anyhow::bail!("Server unreachable: {}", e),
            }
        }
        None => serve(DEFAULT_PORT, None, false).await?,
    }

    Ok(())
}
