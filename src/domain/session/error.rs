use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SessionServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<SessionServiceError> for AppError {
    fn from(err: SessionServiceError) -> Self {
        match err {
            SessionServiceError::Invalid(msg) => AppError::BadRequest(msg),
            SessionServiceError::Dependency(msg) => AppError::ExternalService(msg),
            SessionServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_errors_map_to_app_errors() {
        let invalid: AppError = SessionServiceError::Invalid("empty".to_string()).into();
        assert!(matches!(invalid, AppError::BadRequest(_)));

        let dependency: AppError =
            SessionServiceError::Dependency("backend down".to_string()).into();
        assert!(matches!(dependency, AppError::ExternalService(_)));

        let other: AppError = SessionServiceError::Other(anyhow::anyhow!("boom")).into();
        assert!(matches!(other, AppError::Internal(_)));
    }
}
