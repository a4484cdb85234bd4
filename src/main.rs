use clap::Parser;
use color_eyre::Result;
use log::warn;
use mydaily::{
    cli::{Cli, Commands},
    Config, Database, Profile,
};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;
    env_logger::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // Load configuration with the determined profile
    let config = Config::load_with_profile(profile)?;

    // Open the database once for the whole process. An unusable path is
    // not fatal: the TUI runs with every data-bound view disabled.
    let database = open_database(&config);

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = mydaily::tui::App::new(config, database);
            mydaily::tui::run_event_loop(app)?;
        }
        Commands::Add { title, description } => {
            let db = database
                .ok_or_else(|| color_eyre::eyre::eyre!("Database is unavailable; check the configured database path"))?;
            mydaily::cli::handle_add(title, description, &db)?;
        }
        Commands::Journal { content, date } => {
            let db = database
                .ok_or_else(|| color_eyre::eyre::eyre!("Database is unavailable; check the configured database path"))?;
            mydaily::cli::handle_journal(content, date, &db)?;
        }
    }

    Ok(())
}

fn open_database(config: &Config) -> Option<Database> {
    let db_path = config.get_database_path();
    let path_str = match db_path.to_str() {
        Some(s) => s,
        None => {
            warn!("Database path contains invalid UTF-8; running without a database");
            return None;
        }
    };

    match Database::new(path_str) {
        Ok(db) => Some(db),
        Err(e) => {
            warn!("Failed to open database at {}: {}", path_str, e);
            None
        }
    }
}
