//! Bot initialization and command list
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation (custom Bot API server, request timeout)
//! - Registration of the command list shown in the Telegram UI

use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use crate::core::config::Config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Я умею:")]
pub enum Command {
    #[command(description = "главное меню")]
    Start,
    #[command(description = "список университетов")]
    Universities,
    #[command(description = "список специальностей")]
    Specs,
    #[command(description = "справка")]
    Help,
    #[command(description = "поиск специальности: /search экономика")]
    Search(String),
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token, invalid URL or HTTP client failure
pub fn create_bot(config: &Config) -> anyhow::Result<Bot> {
    let token = config
        .bot_token
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("BOT_TOKEN is not set"))?;
    let client = ClientBuilder::new().timeout(config.network.timeout()).build()?;
    let bot = Bot::with_client(token.expose_secret(), client);

    let bot = match &config.bot_api_url {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(vec![
        BotCommand::new("start", "главное меню"),
        BotCommand::new("universities", "список университетов"),
        BotCommand::new("specs", "список специальностей"),
        BotCommand::new("search", "поиск специальности"),
        BotCommand::new("help", "справка"),
    ])
    .await?;

    Ok(())
}
