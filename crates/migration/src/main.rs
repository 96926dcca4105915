use clap::Parser;
use common::{config::Config, logging};
use migration::{cli::run_migrate, sea_orm::Database};
use sea_orm_cli::MigrateSubcommands;
use tracing::info;

/// Class booking database schema management.
#[derive(Parser)]
#[clap(about = "Apply or revert class booking database migrations")]
struct Args {
    /// Migration command, applies every pending migration if omitted.
    #[clap(subcommand)]
    command: Option<MigrateSubcommands>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let config = Config::new()?;

    logging::init(&config);

    info!("connecting to database");
    let db = Database::connect(&config.database.url).await?;
    info!("database connection established");

    run_migrate(migration::Migrator, &db, args.command, false)
        .await
        .map_err(|err| anyhow::Error::msg(err.to_string()))?;

    info!("migrations finished");

    Ok(())
}
