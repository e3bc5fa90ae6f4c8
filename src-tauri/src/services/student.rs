use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::services::csv_codec::decode_student_names;
use crate::services::ids::next_id;
use crate::services::storage::{load_json, save_json, KeyValueStore, StoreError, WriteGuard, STUDENTS_KEY};

#[derive(Debug)]
pub enum StudentError {
    NotFound(String),
    StoreError(String),
}

impl fmt::Display for StudentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentError::NotFound(msg) => write!(f, "Student not found: {}", msg),
            StudentError::StoreError(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for StudentError {}

impl From<StoreError> for StudentError {
    fn from(err: StoreError) -> Self {
        StudentError::StoreError(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub grade: String,
    /// Keyed by feedback option id. May hold ids of options that no longer exist.
    #[serde(default)]
    pub selected: HashMap<u64, bool>,
}

impl Student {
    pub fn new(name: &str) -> Self {
        Self {
            id: next_id(),
            name: name.to_string(),
            grade: String::new(),
            selected: HashMap::new(),
        }
    }

    pub fn blank() -> Self {
        Self::new("")
    }

    pub fn is_selected(&self, option_id: u64) -> bool {
        self.selected.get(&option_id).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    Replace,
    Append,
}

impl ImportMode {
    /// Maps the Replace/Append dialog answer, where the confirming button means replace.
    pub fn from_dialog_choice(replace: bool) -> Self {
        if replace {
            ImportMode::Replace
        } else {
            ImportMode::Append
        }
    }
}

#[derive(Clone)]
pub struct StudentService {
    store: Arc<dyn KeyValueStore>,
}

impl StudentService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Students exactly as persisted; `None` when nothing was ever saved.
    pub fn stored(&self) -> Result<Option<Vec<Student>>, StudentError> {
        Ok(load_json(self.store.as_ref(), STUDENTS_KEY)?)
    }

    /// Current table. A fresh session starts with one blank row, which is persisted so its id stays stable.
    pub fn list(&self) -> Result<Vec<Student>, StudentError> {
        if let Some(students) = self.stored()? {
            return Ok(students);
        }

        let _writes = self.store.write_lock()?;
        self.load_or_init()
    }

    pub fn find(&self, id: u64) -> Result<Student, StudentError> {
        self.list()?
            .into_iter()
            .find(|student| student.id == id)
            .ok_or_else(|| StudentError::NotFound(id.to_string()))
    }

    pub fn add_row(&self) -> Result<Student, StudentError> {
        let _writes = self.store.write_lock()?;
        let student = Student::blank();
        let mut students = self.load_or_init()?;
        students.push(student.clone());
        self.save(&students)?;

        tracing::debug!(id = student.id, "student row added");
        Ok(student)
    }

    pub fn update_name(&self, id: u64, name: &str) -> Result<Student, StudentError> {
        self.update(id, |student| student.name = name.to_string())
    }

    pub fn update_grade(&self, id: u64, grade: &str) -> Result<Student, StudentError> {
        self.update(id, |student| student.grade = grade.to_string())
    }

    pub fn toggle_selection(&self, student_id: u64, option_id: u64) -> Result<Student, StudentError> {
        self.update(student_id, |student| {
            let selected = !student.is_selected(option_id);
            student.selected.insert(option_id, selected);
        })
    }

    pub fn delete(&self, id: u64) -> Result<(), StudentError> {
        let _writes = self.store.write_lock()?;
        let mut students = self.load_or_init()?;
        let before = students.len();
        students.retain(|student| student.id != id);

        if students.len() == before {
            return Err(StudentError::NotFound(id.to_string()));
        }

        self.save(&students)?;
        tracing::debug!(id, "student deleted");
        Ok(())
    }

    /// Forgets a removed feedback option in every student's selections. Runs under a write lock
    /// the caller already holds, so it can share one with the option removal.
    pub fn drop_selection(&self, _writes: &WriteGuard<'_>, option_id: u64) -> Result<(), StoreError> {
        let Some(mut students) = load_json::<Vec<Student>>(self.store.as_ref(), STUDENTS_KEY)? else {
            return Ok(());
        };

        let mut changed = false;
        for student in &mut students {
            changed |= student.selected.remove(&option_id).is_some();
        }

        if changed {
            save_json(self.store.as_ref(), STUDENTS_KEY, &students)?;
        }
        Ok(())
    }

    /// Imports one student per non-blank line. Appending keeps existing rows and their ids.
    pub fn import_names(&self, text: &str, mode: ImportMode) -> Result<Vec<Student>, StudentError> {
        let imported: Vec<Student> = decode_student_names(text)
            .iter()
            .map(|name| Student::new(name))
            .collect();

        let _writes = self.store.write_lock()?;
        let students = match mode {
            ImportMode::Replace => imported.clone(),
            ImportMode::Append => {
                let mut students = self.stored()?.unwrap_or_default();
                students.extend(imported.iter().cloned());
                students
            }
        };

        self.save(&students)?;
        tracing::info!(count = imported.len(), ?mode, "student names imported");
        Ok(imported)
    }

    fn update<F>(&self, id: u64, apply: F) -> Result<Student, StudentError>
    where
        F: FnOnce(&mut Student),
    {
        let _writes = self.store.write_lock()?;
        let mut students = self.load_or_init()?;
        let student = students
            .iter_mut()
            .find(|student| student.id == id)
            .ok_or_else(|| StudentError::NotFound(id.to_string()))?;

        apply(student);
        let updated = student.clone();

        self.save(&students)?;
        Ok(updated)
    }

    /// Caller holds the write lock.
    fn load_or_init(&self) -> Result<Vec<Student>, StudentError> {
        if let Some(students) = self.stored()? {
            return Ok(students);
        }

        let students = vec![Student::blank()];
        self.save(&students)?;
        Ok(students)
    }

    fn save(&self, students: &[Student]) -> Result<(), StudentError> {
        save_json(self.store.as_ref(), STUDENTS_KEY, students)?;
        Ok(())
    }
}
