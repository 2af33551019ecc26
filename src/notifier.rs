use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::{debug, error};

/// Outbound delivery seam. Implementations must not raise: a failed send
/// is their problem to log, never the caller's to handle.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn send(&self, text: &str);
}

/// Delivers plain-text messages to one fixed Telegram chat.
#[derive(Debug)]
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_id: &str) -> Result<Self> {
        let chat_id: i64 = chat_id
            .trim()
            .parse()
            .with_context(|| format!("invalid Telegram chat id: {:?}", chat_id))?;

        Ok(Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
        })
    }
}

#[async_trait]
impl Notify for TelegramNotifier {
    // Swallows delivery failures by contract. The poller reports its own
    // errors through this same adapter, so an erroring send here would
    // recurse into another send.
    async fn send(&self, text: &str) {
        match self.bot.send_message(self.chat_id, text).await {
            Ok(_) => debug!("delivered message: {:?}", text),
            Err(e) => error!(
                "failed to deliver {:?} to chat {}: {}",
                text, self.chat_id, e
            ),
        }
    }
}
