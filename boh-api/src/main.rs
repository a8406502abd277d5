use boh_api::{
    app,
    handlers::AppState,
    store::{pg::run_migrations, MemoryStore, PgStore},
};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "BOH_API_ADDR", default_value = "0.0.0.0:8100")]
        addr: String,
        #[arg(long, env = "BOH_STORE", value_enum, default_value_t = StoreKind::Postgres)]
        store: StoreKind,
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
    /// Apply pending database migrations and exit
    Migrate {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StoreKind {
    Memory,
    Postgres,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Migrate { database_url } => run_migrations(&database_url).await,
        Commands::Serve {
            addr,
            store,
            database_url,
        } => {
            let state = match store {
                StoreKind::Memory => {
                    info!("using in-memory store");
                    AppState::new(MemoryStore::seeded())
                }
                StoreKind::Postgres => {
                    let database_url =
                        database_url.ok_or("DATABASE_URL must be set for the postgres store")?;
                    run_migrations(&database_url).await?;
                    AppState::new(PgStore::new(database_url))
                }
            };

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("Back of house API listening on {}", listener.local_addr()?);

            axum::serve(listener, app(state)).await?;
            Ok(())
        }
    }
}
