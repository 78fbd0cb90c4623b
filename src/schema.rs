use teloxide::{dispatching::UpdateHandler, prelude::*, utils::command::BotCommands};

use crate::{commands::*, errors::BotError, handlers::text_received};

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Show the welcome message
    Start,
    /// Show this help message
    Help,
    /// Start the video download process
    Youtube,
    /// Cancel the current download request
    Cancel,
}

fn is_plain_text(text: &str) -> bool {
    !text.starts_with('/')
}

pub fn schema() -> UpdateHandler<BotError> {
    use dptree::case;

    Update::filter_message()
        .branch(
            teloxide::filter_command::<Command, _>()
                .branch(case![Command::Start].endpoint(start))
                .branch(case![Command::Help].endpoint(help))
                .branch(case![Command::Youtube].endpoint(youtube))
                .branch(case![Command::Cancel].endpoint(cancel)),
        )
        // Unknown commands fall through here and are dropped
        .branch(
            Message::filter_text()
                .filter(|text: String| is_plain_text(&text))
                .endpoint(text_received),
        )
}
