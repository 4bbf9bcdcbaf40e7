use std::fs::File;
use std::sync::Arc;

use atlas::api::{CountryClient, CountrySource};
use atlas::cli::{self, Command};
use atlas::core::config::{self, ResolvedConfig};
use atlas::core::session::SessionStore;
use atlas::core::storage::{FileStorage, MemoryStorage, Storage};
use atlas::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(name = "atlas", about = "Explore the countries of the world from your terminal")]
struct Args {
    /// Country API base URL (overrides config and ATLAS_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Keep the session in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

fn init_logging(config: &ResolvedConfig) {
    // Writes atlas.log next to the config, or in the current directory without a home
    let log_path = config::atlas_dir()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| dir.join("atlas.log"))
        .unwrap_or_else(|| "atlas.log".into());

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&log_path) {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }
}

fn build_storage(config: &ResolvedConfig, ephemeral: bool) -> Arc<dyn Storage> {
    match (&config.storage_path, ephemeral) {
        (Some(path), false) => {
            log::info!("Using session storage at {}", path.display());
            Arc::new(FileStorage::new(path))
        }
        _ => {
            log::info!("Using in-memory session storage");
            Arc::new(MemoryStorage::new())
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}. Using defaults.");
        config::AtlasConfig::default()
    });
    let resolved = config::resolve(&file_config, args.api_url.as_deref());
    init_logging(&resolved);

    log::info!("Atlas starting up against {}", resolved.api_base_url);

    let session = Arc::new(
        SessionStore::new(build_storage(&resolved, args.ephemeral))
            .with_login_latency(resolved.login_latency),
    );
    session.init_auth();

    let source: Arc<dyn CountrySource> = Arc::new(
        CountryClient::new(Some(resolved.api_base_url.clone()))
            .with_suggestion_limit(resolved.suggestion_limit),
    );

    match args.command.unwrap_or(Command::Explore) {
        Command::Explore => tui::run(&resolved, session, source),
        command => match cli::execute(command, &session, source.as_ref()).await {
            Ok(output) => {
                print!("{output}");
                Ok(())
            }
            Err(e) => {
                log::warn!("Command failed: {}", e);
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }
}
