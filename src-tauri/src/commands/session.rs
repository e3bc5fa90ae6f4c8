use crate::error::AppResult;
use crate::models::SuccessResponse;
use crate::services::SessionService;
use tauri::State;

#[tauri::command]
pub async fn reset_session(session_service: State<'_, SessionService>) -> AppResult<SuccessResponse<()>> {
    session_service.reset()?;
    Ok(SuccessResponse::with_message((), "Session has been reset."))
}
