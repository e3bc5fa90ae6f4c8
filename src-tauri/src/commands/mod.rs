pub mod feedback;
pub mod session;
pub mod student;

use crate::error::{AppError, AppResult};

/// Reads a user-picked import file in one go.
pub async fn read_import_file(file_path: &str) -> AppResult<String> {
    tokio::fs::read_to_string(file_path)
        .await
        .map_err(|e| AppError::Io(format!("Failed to read {}: {}", file_path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_import_file() {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("students.csv");
        fs::write(&file_path, "Alice\n\nBob\n").expect("Failed to write file");

        let content = read_import_file(file_path.to_str().unwrap())
            .await
            .expect("Should read file");

        assert_eq!(content, "Alice\n\nBob\n");
    }

    #[tokio::test]
    async fn test_read_import_file_missing() {
        let result = read_import_file("/nonexistent/directory/students.csv").await;

        assert!(matches!(result, Err(AppError::Io(msg)) if msg.starts_with("Failed to read")));
    }
}
