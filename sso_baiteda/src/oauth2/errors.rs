use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum OAuth2Error {
    #[error("Token exchange error: {0}")]
    TokenExchange(String),

    #[error("Fetch user profile error: {0}")]
    FetchProfile(String),

    #[error("Malformed profile: {0}")]
    MalformedProfile(String),

    #[error("Serde error: {0}")]
    Serde(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}
