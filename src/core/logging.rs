//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup summary of the effective configuration (secrets redacted)

use anyhow::Result;
use simplelog::{ColorChoice, CombinedLogger, Config as LogConfig, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;

use crate::core::config::Config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
/// * `level` - Minimum level written to both sinks
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the log file or a logger was already set
pub fn init_logger(log_file_path: &str, level: log::LevelFilter) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(level, LogConfig::default(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, LogConfig::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at application startup
pub fn log_configuration(config: &Config) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("⚙️  Configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Database: {}", config.database_path);
    log::info!("Log file: {} (level {})", config.log_file_path, config.log_level_filter());
    match &config.bot_api_url {
        Some(url) => log::info!("Bot API: {}", url),
        None => log::info!("Bot API: default"),
    }
    log::info!(
        "Bot token: {}",
        if config.bot_token.is_some() { "set" } else { "not set" }
    );
    log::info!(
        "Lists: {} items, search: {} hits, {} buttons per row",
        config.display.max_list_items,
        config.display.search_results_limit,
        config.display.buttons_per_row
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::NamedTempFile;

    #[test]
    fn test_init_logger_creates_log_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        // A logger may already be installed by another test in this process,
        // so only the file creation side effect is asserted.
        let _ = init_logger(path, log::LevelFilter::Info);
        assert!(temp_file.path().exists());
    }

    #[test]
    fn test_init_logger_fails_for_missing_directory() {
        let result = init_logger("/nonexistent-dir/abiturbot/app.log", log::LevelFilter::Info);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_configuration_runs_without_logger() {
        log_configuration(&Config::default());
    }
}
