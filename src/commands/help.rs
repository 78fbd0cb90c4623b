use std::sync::Arc;

use teloxide::prelude::*;

use crate::{conversation::Conversation, errors::HandlerResult, handlers::send_reply};

pub async fn help(bot: Bot, msg: Message, conversation: Arc<Conversation>) -> HandlerResult {
    send_reply(&bot, msg.chat.id, conversation.help()).await
}
