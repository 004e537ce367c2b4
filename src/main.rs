use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use abiturbot::cli::{Cli, Commands};
use abiturbot::core::{init_logger, log_configuration, Config};
use abiturbot::dialog::Router;
use abiturbot::loader;
use abiturbot::storage::{create_pool, Dao, DbPool, Specialty, University};
use abiturbot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point
///
/// Parses CLI arguments and dispatches to the requested subcommand.
///
/// # Errors
/// Returns an error if initialization fails (config, logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before config extraction
    let _ = dotenv();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logger(&config.log_file_path, config.log_level_filter())?;
    log_configuration(&config);

    let db_pool = Arc::new(create_pool(&config.database_path).context("Failed to create database pool")?);

    match cli.command {
        Some(Commands::Run) | None => run_bot(config, db_pool).await,
        Some(Commands::Load {
            universities,
            specialties,
        }) => {
            let report = loader::load_files(
                &Dao::new(Arc::clone(&db_pool)),
                &Dao::new(Arc::clone(&db_pool)),
                &universities,
                &specialties,
            )
            .await
            .context("Failed to load data files")?;
            log::info!(
                "Load finished: universities +{} (skipped {}), specialties +{} (skipped {}), mark warnings {}",
                report.universities_inserted,
                report.universities_skipped,
                report.specialties_inserted,
                report.specialties_skipped,
                report.mark_warnings
            );
            Ok(())
        }
        Some(Commands::Show) => {
            let dump = loader::render_dump(&Dao::new(Arc::clone(&db_pool)), &Dao::new(db_pool)).await?;
            print!("{}", dump);
            Ok(())
        }
    }
}

/// Runs the bot with long polling until Ctrl-C.
async fn run_bot(config: Config, db_pool: Arc<DbPool>) -> Result<()> {
    config.validate_for_bot()?;
    let bot = create_bot(&config)?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let config = Arc::new(config);
    let router = Router::new(
        Arc::clone(&config),
        Dao::<University>::new(Arc::clone(&db_pool)),
        Dao::<Specialty>::new(db_pool),
    );
    let handler = schema(HandlerDeps::new(Arc::new(router)));

    // Updates queued while the bot was offline are dropped on start
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    log::info!("Starting bot in long polling mode");
    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
