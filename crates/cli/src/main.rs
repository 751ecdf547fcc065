use anyhow::Context;
use bookshelf_app::StoreBackend;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Book catalog service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Keep the catalog in memory instead of PostgreSQL
        #[arg(long)]
        memory: bool,
    },
    /// Connect to the configured database and ping it
    DbCheck,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { memory } => {
            let backend = if memory {
                StoreBackend::Memory
            } else {
                StoreBackend::Postgres
            };
            bookshelf_app::serve(settings, backend).await
        }
        Command::DbCheck => {
            let pool = bookshelf_db::connect(&settings.database).await?;
            pool.close().await;
            Ok(())
        }
    }
}
