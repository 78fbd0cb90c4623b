use std::{future::Future, path::PathBuf};

use teloxide::{
    ApiError, RequestError,
    prelude::*,
    types::{ChatAction, InputFile},
};

use crate::{conversation::Reply, errors::HandlerResult, temp_file::TempFile};

const VIDEO_TOO_LARGE: &str = "The video is too large to send through Telegram.";

#[derive(Debug, PartialEq, Eq)]
enum Delivery {
    Sent,
    TooLarge,
}

pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> HandlerResult {
    // owns the file from here on, so every exit path below deletes it
    let video = reply.video.map(TempFile::new);

    bot.send_message(chat_id, reply.text).await?;

    if let Some(file) = video {
        let delivery = upload_then_remove(file, |path| async move {
            bot.send_chat_action(chat_id, ChatAction::UploadVideo)
                .await?;
            bot.send_video(chat_id, InputFile::file(path))
                .supports_streaming(true)
                .await?;
            Ok::<(), RequestError>(())
        })
        .await?;

        if delivery == Delivery::TooLarge {
            bot.send_message(chat_id, VIDEO_TOO_LARGE).await?;
        }
    }

    Ok(())
}

/// Run `upload`, delete the file whatever happened, and sort out the
/// "too large" rejection from real failures
async fn upload_then_remove<F, Fut>(file: TempFile, upload: F) -> Result<Delivery, RequestError>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<(), RequestError>>,
{
    let result = upload(file.path().to_path_buf()).await;
    let path = file.path().display().to_string();
    drop(file);

    match result {
        Ok(()) => Ok(Delivery::Sent),
        Err(RequestError::Api(ApiError::RequestEntityTooLarge)) => {
            log::warn!("{} is too large for Telegram", path);
            Ok(Delivery::TooLarge)
        }
        Err(e) => Err(e),
    }
}
