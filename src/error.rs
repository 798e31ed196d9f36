use thiserror::Error;

/// Errors raised outside the signal core (fetching, parsing, configuration)
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (code {code}): {msg}")]
    Api { code: String, msg: String },

    #[error("No data returned for {0}")]
    EmptyData(String),

    #[error("Failed to parse {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}
