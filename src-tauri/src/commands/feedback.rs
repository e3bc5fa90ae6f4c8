use crate::error::AppResult;
use crate::models::SuccessResponse;
use crate::services::{ExportService, FeedbackOption, FeedbackService, StudentService};
use tauri::State;

#[tauri::command]
pub async fn list_feedback_options(
    feedback_service: State<'_, FeedbackService>,
) -> AppResult<SuccessResponse<Vec<FeedbackOption>>> {
    let options = feedback_service.list()?;
    Ok(SuccessResponse::new(options))
}

#[tauri::command]
pub async fn add_feedback_option(
    label: String,
    description: Option<String>,
    feedback_service: State<'_, FeedbackService>,
) -> AppResult<SuccessResponse<Option<FeedbackOption>>> {
    let option = feedback_service.add(&label, description.as_deref().unwrap_or_default())?;
    Ok(SuccessResponse::new(option))
}

#[tauri::command]
pub async fn remove_feedback_option(
    id: u64,
    feedback_service: State<'_, FeedbackService>,
    student_service: State<'_, StudentService>,
) -> AppResult<SuccessResponse<()>> {
    feedback_service.remove_with(id, |writes, id| student_service.drop_selection(writes, id))?;

    Ok(SuccessResponse::new(()))
}

#[tauri::command]
pub async fn get_custom_prompt(feedback_service: State<'_, FeedbackService>) -> AppResult<SuccessResponse<String>> {
    let prompt = feedback_service.custom_prompt()?;
    Ok(SuccessResponse::new(prompt))
}

#[tauri::command]
pub async fn set_custom_prompt(
    text: String,
    feedback_service: State<'_, FeedbackService>,
) -> AppResult<SuccessResponse<()>> {
    feedback_service.set_custom_prompt(&text)?;
    Ok(SuccessResponse::new(()))
}

#[tauri::command]
pub fn export_feedback_csv(
    file_path: String,
    export_service: State<'_, ExportService>,
) -> AppResult<SuccessResponse<String>> {
    export_service.export_feedback_csv(&file_path)?;
    Ok(SuccessResponse::new("Feedback options exported".to_string()))
}

#[tauri::command]
pub async fn import_feedback_csv(
    file_path: String,
    feedback_service: State<'_, FeedbackService>,
) -> AppResult<SuccessResponse<Vec<FeedbackOption>>> {
    let content = super::read_import_file(&file_path).await?;
    let options = feedback_service.import_csv(&content)?;

    Ok(SuccessResponse::new(options))
}
