use http::StatusCode;
use sso_baiteda::CoordinationError;

/// Helper trait for converting errors to a standard response error format
pub(super) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Implementation for CoordinationError to map variants to appropriate status codes
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                CoordinationError::UnknownProvider(_) => StatusCode::NOT_FOUND,
                CoordinationError::ProviderNotConfigured(_) => StatusCode::NOT_FOUND,
                CoordinationError::RegistrationDisabled { .. } => StatusCode::FORBIDDEN,
                CoordinationError::NotLinked(_) => StatusCode::BAD_REQUEST,
                CoordinationError::OAuth2(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}
