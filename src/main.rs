use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planner_core::{Database, EntityStore, JsonFile, Persistence};
use study_planner::cli::{Cli, Commands};
use study_planner::commands::{self, Context};
use study_planner::config::{Config, Storage};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "studyplan=info,study_planner=info,planner_core=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    // Default: show the dashboard
    let command = cli.command.unwrap_or(Commands::Dashboard);

    match config.storage.clone() {
        Storage::Sqlite(path) => {
            let db = Database::open(&path)?;
            db.migrate()?;
            execute(db, command, config)
        }
        Storage::Json(path) => execute(JsonFile::new(path), command, config),
    }
}

fn execute<P: Persistence>(backend: P, command: Commands, config: Config) -> anyhow::Result<()> {
    let mut store = EntityStore::open(backend)?;
    let ctx = Context::new(config);
    let mut out = std::io::stdout().lock();
    commands::run(&mut store, command, &ctx, &mut out)
}
