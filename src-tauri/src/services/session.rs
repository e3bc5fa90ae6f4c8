use std::sync::Arc;

use crate::services::storage::{KeyValueStore, StoreError};

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Forgets options, custom prompt and students in one go.
    pub fn reset(&self) -> Result<(), StoreError> {
        let _writes = self.store.write_lock()?;
        self.store.clear()?;
        tracing::info!("session reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStore;
    use crate::services::{FeedbackService, StudentService};

    #[test]
    fn test_reset_clears_everything() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let feedback = FeedbackService::new(store.clone());
        let students = StudentService::new(store.clone());
        let session = SessionService::new(store);

        feedback.add("Too Short", "Expand on your ideas.").unwrap();
        feedback.set_custom_prompt("Be encouraging.").unwrap();
        students.import_names("Alice\nBob", crate::services::ImportMode::Replace).unwrap();

        session.reset().expect("Failed to reset session");

        assert!(feedback.list().unwrap().is_empty());
        assert_eq!(feedback.custom_prompt().unwrap(), "");
        assert!(students.stored().unwrap().is_none());
    }
}
