//! Error type for the login/unlink coordination layer.

use thiserror::Error;

use crate::host::{StoreError, Uid, UserError};
use crate::oauth2::OAuth2Error;

/// Errors that can occur while coordinating login, unlink, and menu state.
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// General coordination error
    #[error("Coordination error: {0}")]
    Coordination(String),

    /// No descriptor registered under the requested provider name
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// The admin has not supplied client credentials for the provider
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// Registration via SSO is administratively disabled. The display form
    /// is the host's translatable error tag.
    #[error("[[error:sso-registration-disabled, {provider}]]")]
    RegistrationDisabled { provider: String },

    /// The account has no external identity linked
    #[error("No external identity linked for uid {0}")]
    NotLinked(Uid),

    /// A deletion in the unlink sequence failed; the association may be
    /// left dangling
    #[error("Unlink failed for uid {uid}: {reason}")]
    UnlinkFailed { uid: Uid, reason: String },

    /// Error from the OAuth2 transport or profile handling
    #[error("OAuth2 error: {0}")]
    OAuth2(OAuth2Error),

    /// Error from the host user system
    #[error("User error: {0}")]
    User(UserError),

    /// Error from the host durable store
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl CoordinationError {
    /// Log the error and return self, allowing method chaining at the point
    /// where an error is constructed.
    pub fn log(self) -> Self {
        tracing::error!("{}", self);
        self
    }
}

// From implementations that log at conversion time, so storage and
// transport failures surface in the logs even when callers only map them to
// a user-facing redirect.

impl From<OAuth2Error> for CoordinationError {
    fn from(err: OAuth2Error) -> Self {
        let error = Self::OAuth2(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        let error = Self::User(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<StoreError> for CoordinationError {
    fn from(err: StoreError) -> Self {
        let error = Self::Store(err);
        tracing::error!("{}", error);
        error
    }
}
