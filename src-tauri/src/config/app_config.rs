use std::env;

pub const DEFAULT_STORE_FILE: &str = "feedback.json";
pub const DEFAULT_WINDOW_SCALE: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// File name of the key-value store inside the app data directory.
    pub store_file: String,
    /// Fraction of the monitor the main window covers.
    pub window_scale: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_file: DEFAULT_STORE_FILE.to_string(),
            window_scale: DEFAULT_WINDOW_SCALE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_file = lookup("FEEDBACK_PROMPTER_STORE")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_FILE.to_string());

        let window_scale = lookup("FEEDBACK_PROMPTER_WINDOW_SCALE")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|scale| scale.is_finite())
            .map(|scale| scale.clamp(0.3, 1.0))
            .unwrap_or(DEFAULT_WINDOW_SCALE);

        Self {
            store_file,
            window_scale,
        }
    }
}
