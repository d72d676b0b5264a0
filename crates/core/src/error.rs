use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapError {
    #[error("browser error: {0}")]
    Browser(String),

    #[error("no clickable element appeared within {0}s")]
    ElementWait(u64),

    #[error("no clickable element matched \"{0}\"")]
    MatchNotFound(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("upload error: {0}")]
    Upload(String),

    #[error("cookie cache error: {0}")]
    CookieCache(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
