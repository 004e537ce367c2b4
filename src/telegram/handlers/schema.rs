//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{ChatMemberUpdated, Message, ParseMode};

use super::types::{HandlerDeps, HandlerError};
use crate::dialog::{Input, Reply};
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Commands are matched first, then plain text, then button presses.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_started = deps.clone();
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(chat_started_handler(deps_started))
        .branch(command_handler(deps_commands))
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

/// Sends a router reply as a new HTML message with its keyboard.
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> ResponseResult<Message> {
    bot.send_message(chat_id, reply.text)
        .parse_mode(ParseMode::Html)
        .reply_markup(reply.keyboard)
        .await
}

/// Handler for a private chat that unblocked the bot
///
/// A brand-new chat always sends `/start` as well, so only the blocked ->
/// member transition is answered here.
fn chat_started_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_my_chat_member()
        .filter(|update: ChatMemberUpdated| {
            update.chat.is_private()
                && update.old_chat_member.kind.is_banned()
                && update.new_chat_member.kind.is_present()
        })
        .endpoint(move |bot: Bot, update: ChatMemberUpdated| {
            let deps = deps.clone();
            async move {
                log::info!("Chat {} started the bot again", update.chat.id);

                let reply = deps.router.handle(Input::Started).await;
                send_reply(&bot, update.chat.id, reply).await?;
                Ok(())
            }
        })
}

/// Handler for bot commands (/start, /universities, /specs, /help, /search)
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("Received command {:?} from chat {}", cmd, msg.chat.id);

                let reply = deps.router.handle(Input::Command(cmd)).await;
                send_reply(&bot, msg.chat.id, reply).await?;
                Ok(())
            }
        },
    ))
}

/// Handler for free text
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.text().map(str::to_owned))
        .endpoint(move |bot: Bot, msg: Message, text: String| {
            let deps = deps.clone();
            async move {
                log::info!("Message from chat {}: {}", msg.chat.id, text);

                let reply = deps.router.handle(Input::Text(text)).await;
                send_reply(&bot, msg.chat.id, reply).await?;
                Ok(())
            }
        })
}

/// Handler for callback queries (inline keyboard buttons)
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            // Stop the button spinner before the slower store lookups
            if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                log::warn!("Failed to answer callback query: {}", e);
            }

            let Some(data) = q.data else {
                return Ok(());
            };
            let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
                log::warn!("Callback {} without a message, ignoring", data);
                return Ok(());
            };
            log::info!("Callback from chat {}: {}", chat_id, data);

            let reply = deps.router.handle(Input::Payload(data)).await;
            send_reply(&bot, chat_id, reply).await?;
            Ok(())
        }
    })
}
