use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gazette::{api, config::AppConfig, db};

#[derive(Parser)]
#[command(name = "gazette")]
#[command(about = "News-with-comments and personal-notes service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Gazette server
    Serve {
        /// Port for HTTP API (overrides GAZETTE_PORT; default 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Database file (overrides GAZETTE_DB; defaults to the platform data directory)
        #[arg(long)]
        db: Option<std::path::PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "gazette=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(port_flag: Option<u16>, db_flag: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let port = port_flag.unwrap_or(config.port);

    let db = match db_flag.or_else(|| config.db_path.clone()) {
        Some(path) => db::Database::open(path)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;

    let app = api::create_router(db, config);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Gazette server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve { port, db }) => {
            serve(port, db).await?;
        }
        None => {
            // Default: start server with env/default settings
            serve(None, None).await?;
        }
    }

    Ok(())
}
