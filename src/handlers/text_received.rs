use std::sync::Arc;

use teloxide::prelude::*;

use crate::{
    conversation::Conversation, errors::HandlerResult, handlers::send_reply, session::SessionKey,
};

/// Free text: either a link, a format id, or nothing we are waiting for
pub async fn text_received(
    bot: Bot,
    msg: Message,
    text: String,
    conversation: Arc<Conversation>,
) -> HandlerResult {
    let key = SessionKey::from_message(&msg);

    match conversation.handle_text(key, &text).await {
        Some(reply) => send_reply(&bot, msg.chat.id, reply).await,
        None => {
            log::debug!("Ignoring text from {:?}", key);
            Ok(())
        }
    }
}
