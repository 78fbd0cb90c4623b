use std::sync::Arc;

use teloxide::prelude::*;

use crate::{
    conversation::Conversation, errors::HandlerResult, handlers::send_reply, session::SessionKey,
};

/// Switch the sender into waiting for a link
pub async fn youtube(bot: Bot, msg: Message, conversation: Arc<Conversation>) -> HandlerResult {
    let reply = conversation.begin(SessionKey::from_message(&msg)).await;
    send_reply(&bot, msg.chat.id, reply).await
}
