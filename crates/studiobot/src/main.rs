use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;

use studiobot::bot::{create_bot, setup_bot_commands};
use studiobot::cli::{Cli, Commands};
use studiobot::handlers::{schema, HandlerDeps};
use studiobot::logging::init_logger;
use studiobot::routes::build_router;

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, route table, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    init_logger()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot().await,
        Commands::Routes => print_routes(),
        Commands::Resolve { data } => resolve(&data),
    }
}

fn print_routes() -> Result<()> {
    let router = build_router()?;

    println!("{} callback routes (priority, pattern, description):", router.len());
    for line in router.list_routes() {
        println!("{}", line);
    }

    let conflicts = router.validate_all_patterns();
    if conflicts.is_empty() {
        println!("\nNo pattern conflicts.");
    } else {
        println!("\n{} sample(s) matched by more than one route:", conflicts.len());
        for conflict in &conflicts {
            println!("  {}", conflict);
        }
    }
    Ok(())
}

fn resolve(data: &str) -> Result<()> {
    let router = build_router()?;

    if let Err(e) = studiocore::callback_data::validate(data) {
        println!("warning: {}", e);
    }
    match router.resolve(data) {
        Some(route) => println!("'{}' -> {}", data, route.describe().trim_start()),
        None => println!("'{}' -> no route (falls through to the unrouted handler)", data),
    }
    Ok(())
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    // A broken pattern must stop startup, not silently match nothing
    let router = Arc::new(build_router().map_err(|e| anyhow::anyhow!("Failed to build callback router: {}", e))?);

    let bot = create_bot()?;
    let me = bot.get_me().await?;
    log::info!("Bot username: {:?}, Bot ID: {}", me.username.as_deref(), me.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let deps = HandlerDeps::from_config(Arc::clone(&router));
    if deps.admin_user_id == 0 {
        log::warn!("ADMIN_USER_ID is not set; admin screens and /routes are disabled");
    }

    Dispatcher::builder(bot, schema(deps))
        .error_handler(LoggingErrorHandler::with_custom_text("Error in update handler"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shut down. Callback stats: {}", router.get_stats());
    Ok(())
}
