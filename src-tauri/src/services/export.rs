use std::fmt;
use std::fs::File;
use std::io::Write;

use crate::services::csv_codec::{encode_feedback_csv, encode_student_table};
use crate::services::feedback::FeedbackError;
use crate::services::student::StudentError;
use crate::services::{FeedbackService, StudentService};

pub const FEEDBACK_EXPORT_FILENAME: &str = "feedback_options.csv";
pub const STUDENTS_EXPORT_FILENAME: &str = "student_feedback.csv";

#[derive(Debug)]
pub enum ExportError {
    NoStudents,
    FsError(String),
    FeedbackError(String),
    StudentError(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NoStudents => write!(f, "No student data to export."),
            ExportError::FsError(msg) => write!(f, "File system error: {}", msg),
            ExportError::FeedbackError(msg) => write!(f, "Feedback error: {}", msg),
            ExportError::StudentError(msg) => write!(f, "Student error: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::FsError(err.to_string())
    }
}

impl From<FeedbackError> for ExportError {
    fn from(err: FeedbackError) -> Self {
        ExportError::FeedbackError(err.to_string())
    }
}

impl From<StudentError> for ExportError {
    fn from(err: StudentError) -> Self {
        ExportError::StudentError(err.to_string())
    }
}

#[derive(Clone)]
pub struct ExportService {
    pub feedback_service: FeedbackService,
    pub student_service: StudentService,
}

impl ExportService {
    pub fn new(feedback_service: FeedbackService, student_service: StudentService) -> Self {
        Self {
            feedback_service,
            student_service,
        }
    }

    pub fn feedback_csv(&self) -> Result<String, ExportError> {
        let options = self.feedback_service.list()?;
        let custom_prompt = self.feedback_service.custom_prompt()?;

        Ok(encode_feedback_csv(&options, &custom_prompt))
    }

    pub fn export_feedback_csv(&self, file_path: &str) -> Result<(), ExportError> {
        let csv_content = self.feedback_csv()?;
        self.write_to_file(file_path, &csv_content)?;

        tracing::info!(file_path, "feedback options exported");
        Ok(())
    }

    /// Fails with `NoStudents` when nothing is stored, so no empty file is ever produced.
    pub fn students_csv(&self) -> Result<String, ExportError> {
        let students = match self.student_service.stored()? {
            Some(students) if !students.is_empty() => students,
            _ => return Err(ExportError::NoStudents),
        };

        let options = self.feedback_service.list()?;
        let custom_prompt = self.feedback_service.custom_prompt()?;

        Ok(encode_student_table(&students, &options, &custom_prompt))
    }

    pub fn export_students_csv(&self, file_path: &str) -> Result<(), ExportError> {
        let csv_content = self.students_csv()?;
        self.write_to_file(file_path, &csv_content)?;

        tracing::info!(file_path, "student table exported");
        Ok(())
    }

    pub fn write_to_file(&self, file_path: &str, content: &str) -> Result<(), ExportError> {
        let mut file = File::create(file_path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStore;
    use crate::services::student::ImportMode;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn export_service() -> ExportService {
        let store = Arc::new(MemoryStore::new());
        ExportService::new(FeedbackService::new(store.clone()), StudentService::new(store))
    }

    mod feedback_export {
        use super::*;

        #[test]
        fn test_feedback_csv_uses_stored_options_and_prompt() {
            let export = export_service();
            export.feedback_service.set_custom_prompt("Be encouraging.").unwrap();
            export
                .feedback_service
                .add("Too Short", "Expand on your ideas.")
                .unwrap();

            let csv = export.feedback_csv().expect("Should create CSV content");

            assert_eq!(csv, "# Custom Prompt: Be encouraging.\nToo Short,Expand on your ideas.\n");
        }

        #[test]
        fn test_export_feedback_then_import_restores_state() {
            let export = export_service();
            export.feedback_service.set_custom_prompt("Be encouraging.").unwrap();
            export.feedback_service.add("Too Short", "Expand, please.").unwrap();
            export.feedback_service.add("Great Work", "").unwrap();
            let exported = export.feedback_service.list().unwrap();

            let temp_dir = tempdir().expect("Failed to create temp directory");
            let csv_path = temp_dir.path().join(FEEDBACK_EXPORT_FILENAME);
            let csv_path_str = csv_path.to_str().expect("Failed to get CSV path");
            export.export_feedback_csv(csv_path_str).expect("Export should succeed");

            let fresh = export_service();
            let content = fs::read_to_string(&csv_path).expect("Failed to read file");
            let imported = fresh.feedback_service.import_csv(&content).expect("Import should succeed");

            let pairs = |options: &[crate::services::FeedbackOption]| -> Vec<(String, String)> {
                options.iter().map(|o| (o.label.clone(), o.description.clone())).collect()
            };
            assert_eq!(pairs(&imported), pairs(&exported));
            assert_eq!(fresh.feedback_service.custom_prompt().unwrap(), "Be encouraging.");
        }
    }

    mod student_export {
        use super::*;

        #[test]
        fn test_students_csv_without_students() {
            let export = export_service();

            let result = export.students_csv();

            assert!(matches!(result, Err(ExportError::NoStudents)));
        }

        #[test]
        fn test_export_students_without_students_writes_no_file() {
            let export = export_service();
            let temp_dir = tempdir().expect("Failed to create temp directory");
            let csv_path = temp_dir.path().join(STUDENTS_EXPORT_FILENAME);

            let result = export.export_students_csv(csv_path.to_str().unwrap());

            assert!(matches!(result, Err(ExportError::NoStudents)));
            assert!(!csv_path.exists(), "No file should be written without students");
            if let Err(error) = result {
                assert_eq!(error.to_string(), "No student data to export.");
            }
        }

        #[test]
        fn test_students_csv_with_emptied_table() {
            let export = export_service();
            let id = export.student_service.list().unwrap()[0].id;
            export.student_service.delete(id).unwrap();

            assert!(matches!(export.students_csv(), Err(ExportError::NoStudents)));
        }

        #[test]
        fn test_export_students_csv_success() {
            let export = export_service();
            export.feedback_service.set_custom_prompt("Be encouraging.").unwrap();
            let option = export
                .feedback_service
                .add("Too Short", "Expand on your ideas.")
                .unwrap()
                .unwrap();
            let sam = export
                .student_service
                .import_names("Sam\nAna", ImportMode::Replace)
                .unwrap()
                .remove(0);
            export.student_service.toggle_selection(sam.id, option.id).unwrap();

            let temp_dir = tempdir().expect("Failed to create temp directory");
            let csv_path = temp_dir.path().join(STUDENTS_EXPORT_FILENAME);
            export
                .export_students_csv(csv_path.to_str().unwrap())
                .expect("CSV export should succeed");

            let written = fs::read_to_string(&csv_path).expect("Failed to read file");
            assert_eq!(
                written,
                "Name,Grade,Too Short,Generated Prompt\n\
                 Sam,,Yes,\"Be encouraging. Provide feedback for Sam. Expand on your ideas.\"\n\
                 Ana,,No,\"Be encouraging. Provide feedback for Ana.\""
            );
        }
    }

    mod file_operations {
        use super::*;

        #[test]
        fn test_write_to_file_success() {
            let export = export_service();
            let temp_dir = tempdir().expect("Failed to create temp directory");
            let file_path = temp_dir.path().join("test.txt");
            let file_path_str = file_path.to_str().expect("Failed to get file path");

            let result = export.write_to_file(file_path_str, "test content");
            assert!(result.is_ok(), "Should write file successfully");

            let written_content = fs::read_to_string(&file_path).expect("Failed to read file");
            assert_eq!(written_content, "test content");
        }

        #[test]
        fn test_write_to_file_error() {
            let export = export_service();

            let result = export.write_to_file("/nonexistent/directory/test.txt", "content");
            assert!(result.is_err(), "Should fail with invalid path");

            if let Err(error) = result {
                assert!(error.to_string().starts_with("File system error:"));
            }
        }
    }
}
