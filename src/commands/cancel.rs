use std::sync::Arc;

use teloxide::prelude::*;

use crate::{
    conversation::Conversation, errors::HandlerResult, handlers::send_reply, session::SessionKey,
};

pub async fn cancel(bot: Bot, msg: Message, conversation: Arc<Conversation>) -> HandlerResult {
    let reply = conversation.cancel(SessionKey::from_message(&msg)).await;
    send_reply(&bot, msg.chat.id, reply).await
}
