mod commands;
mod config;
mod error;
mod models;
pub mod services;

use std::sync::Arc;

use config::AppConfig;
use services::{ExportService, FeedbackService, KeyValueStore, PluginStore, SessionService, StudentService};

use tauri::Manager;
use tauri_plugin_store::StoreExt;
use tracing_subscriber::EnvFilter;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app_config = AppConfig::from_env();

    tauri::Builder::default()
        .plugin(tauri_plugin_clipboard_manager::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_store::Builder::default().build())
        .invoke_handler(tauri::generate_handler![
            // Feedback option commands
            commands::feedback::list_feedback_options,
            commands::feedback::add_feedback_option,
            commands::feedback::remove_feedback_option,
            commands::feedback::get_custom_prompt,
            commands::feedback::set_custom_prompt,
            commands::feedback::export_feedback_csv,
            commands::feedback::import_feedback_csv,
            // Student commands
            commands::student::list_students,
            commands::student::add_student,
            commands::student::update_student_name,
            commands::student::update_student_grade,
            commands::student::toggle_student_feedback,
            commands::student::delete_student,
            commands::student::import_student_names,
            commands::student::export_students_csv,
            commands::student::generate_prompt,
            // Session commands
            commands::session::reset_session,
        ])
        .setup(move |app| {
            let store = app
                .handle()
                .store(&app_config.store_file)
                .map_err(|e| format!("Failed to open store {}: {}", app_config.store_file, e))?;
            let store: Arc<dyn KeyValueStore> = Arc::new(PluginStore::new(store));

            let feedback_service = FeedbackService::new(store.clone());
            let student_service = StudentService::new(store.clone());
            let export_service = ExportService::new(feedback_service.clone(), student_service.clone());
            let session_service = SessionService::new(store);

            app.manage(feedback_service);
            app.manage(student_service);
            app.manage(export_service);
            app.manage(session_service);

            let window = app
                .get_webview_window("main")
                .ok_or_else(|| "Failed to get main window".to_string())?;
            config::configure_window_size(&window, app_config.window_scale)?;

            tracing::info!(store = %app_config.store_file, "feedback prompter ready");
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
