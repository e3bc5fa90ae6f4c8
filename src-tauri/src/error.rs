use serde::{Deserialize, Serialize};

use crate::services::feedback::FeedbackError;
use crate::services::storage::StoreError;
use crate::services::student::StudentError;
use crate::services::ExportError;

#[derive(Debug, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Tauri error: {0}")]
    Tauri(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        AppError::Io(error.to_string())
    }
}

impl From<tauri::Error> for AppError {
    fn from(error: tauri::Error) -> Self {
        AppError::Tauri(error.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        AppError::Store(error.to_string())
    }
}

impl From<FeedbackError> for AppError {
    fn from(error: FeedbackError) -> Self {
        match error {
            FeedbackError::NotFound(id) => AppError::NotFound(format!("feedback option {}", id)),
            FeedbackError::StoreError(msg) => AppError::Store(msg),
        }
    }
}

impl From<StudentError> for AppError {
    fn from(error: StudentError) -> Self {
        match error {
            StudentError::NotFound(id) => AppError::NotFound(format!("student {}", id)),
            StudentError::StoreError(msg) => AppError::Store(msg),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(error: ExportError) -> Self {
        match error {
            ExportError::FsError(msg) => AppError::Io(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_tagged_message() {
        let error = AppError::NotFound("student 7".to_string());
        let json = serde_json::to_string(&error).expect("Failed to serialize error");

        assert_eq!(json, r#"{"type":"NotFound","message":"student 7"}"#);
    }

    #[test]
    fn test_service_not_found_maps_to_not_found() {
        let error: AppError = StudentError::NotFound("7".to_string()).into();
        assert!(matches!(error, AppError::NotFound(msg) if msg == "student 7"));

        let error: AppError = FeedbackError::NotFound("3".to_string()).into();
        assert!(matches!(error, AppError::NotFound(msg) if msg == "feedback option 3"));
    }

    #[test]
    fn test_export_fs_error_maps_to_io() {
        let error: AppError = ExportError::FsError("denied".to_string()).into();
        assert_eq!(error.to_string(), "IO error: denied");
    }
}
