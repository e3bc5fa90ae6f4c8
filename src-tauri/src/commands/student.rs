use crate::error::{AppError, AppResult};
use crate::models::SuccessResponse;
use crate::services::prompt::build_prompt;
use crate::services::{ExportError, ExportService, FeedbackService, ImportMode, Student, StudentService};
use tauri::{AppHandle, State};
use tauri_plugin_clipboard_manager::ClipboardExt;
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tokio::sync::oneshot;

#[tauri::command]
pub async fn list_students(student_service: State<'_, StudentService>) -> AppResult<SuccessResponse<Vec<Student>>> {
    let students = student_service.list()?;
    Ok(SuccessResponse::new(students))
}

#[tauri::command]
pub async fn add_student(student_service: State<'_, StudentService>) -> AppResult<SuccessResponse<Student>> {
    let student = student_service.add_row()?;
    Ok(SuccessResponse::new(student))
}

#[tauri::command]
pub async fn update_student_name(
    id: u64,
    name: String,
    student_service: State<'_, StudentService>,
) -> AppResult<SuccessResponse<Student>> {
    let student = student_service.update_name(id, &name)?;
    Ok(SuccessResponse::new(student))
}

#[tauri::command]
pub async fn update_student_grade(
    id: u64,
    grade: String,
    student_service: State<'_, StudentService>,
) -> AppResult<SuccessResponse<Student>> {
    let student = student_service.update_grade(id, &grade)?;
    Ok(SuccessResponse::new(student))
}

#[tauri::command]
pub async fn toggle_student_feedback(
    student_id: u64,
    option_id: u64,
    student_service: State<'_, StudentService>,
) -> AppResult<SuccessResponse<Student>> {
    let student = student_service.toggle_selection(student_id, option_id)?;
    Ok(SuccessResponse::new(student))
}

#[tauri::command]
pub async fn delete_student(id: u64, student_service: State<'_, StudentService>) -> AppResult<SuccessResponse<()>> {
    student_service.delete(id)?;
    Ok(SuccessResponse::new(()))
}

#[tauri::command]
pub async fn import_student_names(
    app: AppHandle,
    file_path: String,
    mode: Option<ImportMode>,
    student_service: State<'_, StudentService>,
) -> AppResult<SuccessResponse<usize>> {
    let content = super::read_import_file(&file_path).await?;

    let mode = match mode {
        Some(mode) => mode,
        None => ask_import_mode(&app).await?,
    };

    let imported = student_service.import_names(&content, mode)?;
    let count = imported.len();

    Ok(SuccessResponse::with_message(count, format!("Imported {} student(s).", count)))
}

#[tauri::command]
pub fn export_students_csv(
    app: AppHandle,
    file_path: String,
    export_service: State<'_, ExportService>,
) -> AppResult<SuccessResponse<bool>> {
    match export_service.export_students_csv(&file_path) {
        Ok(()) => Ok(SuccessResponse::with_message(true, "Student table exported")),
        Err(ExportError::NoStudents) => {
            let message = ExportError::NoStudents.to_string();
            app.dialog()
                .message(message.clone())
                .kind(MessageDialogKind::Info)
                .show(|_| {});
            Ok(SuccessResponse::with_message(false, message))
        }
        Err(e) => Err(e.into()),
    }
}

/// Builds the prompt for one student, copies it to the clipboard and opens a fresh row for the next one.
#[tauri::command]
pub async fn generate_prompt(
    app: AppHandle,
    student_id: u64,
    feedback_service: State<'_, FeedbackService>,
    student_service: State<'_, StudentService>,
) -> AppResult<SuccessResponse<String>> {
    let student = student_service.find(student_id)?;
    let options = feedback_service.list()?;
    let custom_prompt = feedback_service.custom_prompt()?;

    let prompt = build_prompt(&custom_prompt, &student, &options);

    app.clipboard()
        .write_text(prompt.clone())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    student_service.add_row()?;

    tracing::debug!(student_id, "prompt copied to clipboard");
    let message = format!("Copied to clipboard: \n\n{}", prompt);
    Ok(SuccessResponse::with_message(prompt, message))
}

/// Waits for the Replace/Append answer without holding a runtime worker while the dialog is open.
async fn ask_import_mode(app: &AppHandle) -> AppResult<ImportMode> {
    let (answer_tx, answer_rx) = oneshot::channel();

    app.dialog()
        .message("Replace current students? Choose \"Append\" to add to the list.")
        .title("Import student names")
        .buttons(MessageDialogButtons::OkCancelCustom(
            "Replace".to_string(),
            "Append".to_string(),
        ))
        .show(move |replace| {
            let _ = answer_tx.send(replace);
        });

    let replace = answer_rx
        .await
        .map_err(|_| AppError::Internal("Import dialog closed without an answer".to_string()))?;

    Ok(ImportMode::from_dialog_choice(replace))
}
