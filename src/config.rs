use crate::error::MissingCredentials;

/// The three required credentials, read once at startup and handed to the
/// rest of the program by reference. No module-level globals.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth token for the Practicum status API.
    pub practicum_token: String,
    /// Telegram bot token.
    pub telegram_token: String,
    /// Chat the notifications go to.
    pub telegram_chat_id: String,
}

const REQUIRED_VARS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

impl Config {
    /// Read all credentials from the environment.
    ///
    /// Collects every missing or empty variable name into one error so the
    /// operator sees the full list, not just the first hit.
    pub fn from_env() -> Result<Self, MissingCredentials> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MissingCredentials> {
        let mut values = Vec::with_capacity(REQUIRED_VARS.len());
        let mut missing = Vec::new();

        for name in REQUIRED_VARS {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => values.push(value),
                _ => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(MissingCredentials { missing });
        }

        let mut values = values.into_iter();
        Ok(Config {
            practicum_token: values.next().unwrap_or_default(),
            telegram_token: values.next().unwrap_or_default(),
            telegram_chat_id: values.next().unwrap_or_default(),
        })
    }
}
