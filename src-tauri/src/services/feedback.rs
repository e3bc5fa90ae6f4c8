use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::services::csv_codec::{decode_feedback_csv, single_line, FeedbackRow};
use crate::services::ids::next_id;
use crate::services::storage::{
    load_json, save_json, KeyValueStore, StoreError, WriteGuard, CUSTOM_PROMPT_KEY, FEEDBACK_OPTIONS_KEY,
};

#[derive(Debug)]
pub enum FeedbackError {
    NotFound(String),
    StoreError(String),
}

impl fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackError::NotFound(msg) => write!(f, "Feedback option not found: {}", msg),
            FeedbackError::StoreError(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for FeedbackError {}

impl From<StoreError> for FeedbackError {
    fn from(err: StoreError) -> Self {
        FeedbackError::StoreError(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackOption {
    pub id: u64,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

impl FeedbackOption {
    pub fn new(label: &str, description: &str) -> Self {
        Self {
            id: next_id(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }

    /// Text contributed to a generated prompt: the description, or the label when there is none.
    pub fn prompt_text(&self) -> &str {
        if self.description.is_empty() {
            &self.label
        } else {
            &self.description
        }
    }
}

impl From<FeedbackRow> for FeedbackOption {
    fn from(row: FeedbackRow) -> Self {
        FeedbackOption::new(&row.label, &row.description)
    }
}

#[derive(Clone)]
pub struct FeedbackService {
    store: Arc<dyn KeyValueStore>,
}

impl FeedbackService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<FeedbackOption>, FeedbackError> {
        let options = load_json(self.store.as_ref(), FEEDBACK_OPTIONS_KEY)?;
        Ok(options.unwrap_or_default())
    }

    /// Appends a new option. A blank label makes this a no-op and yields `None`.
    pub fn add(&self, label: &str, description: &str) -> Result<Option<FeedbackOption>, FeedbackError> {
        let label = label.trim();
        if label.is_empty() {
            return Ok(None);
        }

        let _writes = self.store.write_lock()?;
        let option = FeedbackOption::new(label, description.trim());
        let mut options = self.list()?;
        options.push(option.clone());
        self.save(&options)?;

        tracing::debug!(id = option.id, label = %option.label, "feedback option added");
        Ok(Some(option))
    }

    pub fn remove(&self, id: u64) -> Result<(), FeedbackError> {
        self.remove_with(id, |_, _| Ok(()))
    }

    /// Removes an option, then runs `cascade` under the same write lock so data referring to the
    /// option is cleaned up before any other mutation can run.
    pub fn remove_with<F>(&self, id: u64, cascade: F) -> Result<(), FeedbackError>
    where
        F: FnOnce(&WriteGuard<'_>, u64) -> Result<(), StoreError>,
    {
        let writes = self.store.write_lock()?;
        let mut options = self.list()?;
        let before = options.len();
        options.retain(|option| option.id != id);

        if options.len() == before {
            return Err(FeedbackError::NotFound(id.to_string()));
        }

        self.save(&options)?;
        cascade(&writes, id)?;

        tracing::debug!(id, "feedback option removed");
        Ok(())
    }

    pub fn replace_all(&self, options: &[FeedbackOption]) -> Result<(), FeedbackError> {
        let _writes = self.store.write_lock()?;
        self.save(options)
    }

    pub fn custom_prompt(&self) -> Result<String, FeedbackError> {
        Ok(self.store.get(CUSTOM_PROMPT_KEY)?.unwrap_or_default())
    }

    /// Line breaks are folded into spaces: the prompt has to fit on the CSV comment line.
    pub fn set_custom_prompt(&self, text: &str) -> Result<(), FeedbackError> {
        let _writes = self.store.write_lock()?;
        self.save_prompt(text)
    }

    /// Replaces the whole option list with the rows of an exported feedback CSV.
    /// The custom prompt is only replaced when the file carries one.
    pub fn import_csv(&self, text: &str) -> Result<Vec<FeedbackOption>, FeedbackError> {
        let decoded = decode_feedback_csv(text);
        let options: Vec<FeedbackOption> = decoded.rows.into_iter().map(FeedbackOption::from).collect();

        let _writes = self.store.write_lock()?;
        self.save(&options)?;
        if let Some(prompt) = decoded.custom_prompt {
            self.save_prompt(&prompt)?;
        }

        tracing::info!(count = options.len(), "feedback options imported");
        Ok(options)
    }

    fn save(&self, options: &[FeedbackOption]) -> Result<(), FeedbackError> {
        save_json(self.store.as_ref(), FEEDBACK_OPTIONS_KEY, options)?;
        Ok(())
    }

    fn save_prompt(&self, text: &str) -> Result<(), FeedbackError> {
        self.store.set(CUSTOM_PROMPT_KEY, single_line(text))?;
        Ok(())
    }
}
