mod app_config;
mod window_config;

pub use app_config::AppConfig;
pub use window_config::configure_window_size;
