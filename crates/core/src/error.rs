use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown LLM provider: '{0}'")]
    UnknownProvider(String),

    #[error("invalid {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}
