use super::Course;
use crate::error::{CatalogError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A course document as stored on disk.
///
/// `course` is the validated typed view used for lookups and checks. Writes go
/// through the JSON the document was read from, so keys the model does not
/// know and absent optional fields survive a rewrite untouched.
#[derive(Debug, Clone)]
pub struct CourseDocument {
    /// File the document was read from and is written back to
    pub path: PathBuf,
    pub course: Course,
    raw: Value,
}

impl CourseDocument {
    /// Parse and validate a stored document
    pub fn from_json_str(path: &Path, content: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(content)
            .map_err(|e| CatalogError::Validation(e.to_string()))?;
        let course: Course = serde_json::from_value(raw.clone())
            .map_err(|e| CatalogError::Validation(e.to_string()))?;
        course.validate()?;

        Ok(Self {
            path: path.to_path_buf(),
            course,
            raw,
        })
    }

    /// The stored JSON, including keys the typed model ignores
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Set `transcript_path` on every lesson whose id is `lesson_id`, in both
    /// the typed view and the stored JSON. Returns the number of lessons set.
    pub fn set_lesson_transcript(&mut self, lesson_id: &str, transcript_path: &str) -> usize {
        for lesson in self.course.lessons_mut().filter(|l| l.id == lesson_id) {
            lesson.transcript_path = Some(transcript_path.to_string());
        }

        let mut updated = 0;
        let sections = self
            .raw
            .get_mut("sections")
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten();
        for section in sections {
            let lessons = section
                .get_mut("lessons")
                .and_then(Value::as_array_mut)
                .into_iter()
                .flatten();
            for lesson in lessons {
                if lesson.get("id").and_then(Value::as_str) != Some(lesson_id) {
                    continue;
                }
                if let Some(fields) = lesson.as_object_mut() {
                    fields.insert(
                        "transcript_path".to_string(),
                        Value::String(transcript_path.to_string()),
                    );
                    updated += 1;
                }
            }
        }
        updated
    }

    /// Pretty JSON with two-space indentation, key order as read
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.raw)?)
    }
}
