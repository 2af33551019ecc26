use thiserror::Error;

/// Everything that can abort a single poll cycle.
///
/// These are the only failure categories the poller recovers from: the
/// cycle is reported to the chat, the cursor stays put, and the loop
/// retries after the usual delay. Anything outside this enum is a
/// programming error and is allowed to propagate.
#[derive(Debug, Error)]
pub enum CycleError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered, but not with 200.
    #[error("API answered with status code {status}")]
    HttpStatus { status: reqwest::StatusCode },

    /// The response body is not valid JSON.
    #[error("failed to decode API response as JSON: {0}")]
    Decode(#[source] reqwest::Error),

    /// The decoded payload is not a JSON object.
    #[error("API response is not a mapping")]
    NotAMapping,

    /// The payload has no `homeworks` key.
    #[error("API response has no \"homeworks\" key")]
    MissingHomeworks,

    /// The `homeworks` value is not a list.
    #[error("\"homeworks\" in the API response is not a list")]
    HomeworksNotAList,

    /// A homework record lacks one or more required fields.
    #[error("homework record is missing required fields: {}", .missing.join(", "))]
    MissingFields { missing: Vec<String> },

    /// A homework carries a status outside the known verdict set.
    #[error("unknown review status \"{status}\" for homework \"{name}\"")]
    UnknownStatus { name: String, status: String },
}

/// Fatal startup error: one or more required environment variables are
/// absent or empty. Never raised after the loop has started.
#[derive(Debug, Error)]
#[error("missing required environment variables: {}", .missing.join(", "))]
pub struct MissingCredentials {
    pub missing: Vec<String>,
}
