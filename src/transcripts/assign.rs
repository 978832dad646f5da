use super::registry::{AssignmentState, RegistryRecord};
use crate::error::{CatalogError, Result};
use crate::store::DocumentStore;
use std::path::PathBuf;
use tracing::{info, warn};

/// Result of an unassign request
#[derive(Debug, Clone)]
pub enum UnassignOutcome {
    /// The record was not assigned; nothing moved, nothing written
    AlreadyUnassigned(RegistryRecord),
    Unassigned {
        record: RegistryRecord,
        /// Binding that was removed
        previous: AssignmentState,
        /// Location the transcript was moved from
        moved_from: PathBuf,
    },
}

/// Binds registry records to lessons and reverses those bindings
pub struct AssignmentEngine<S> {
    store: S,
    /// Holding directory, relative to the project root
    unassigned_dir: PathBuf,
}

impl<S: DocumentStore> AssignmentEngine<S> {
    pub fn new(store: S, unassigned_dir: PathBuf) -> Self {
        Self {
            store,
            unassigned_dir,
        }
    }

    /// Bind an unassigned transcript to every lesson of `course_id` whose id
    /// equals `lesson_id`.
    ///
    /// All preconditions are checked before anything is written. The record
    /// is persisted before the course document.
    pub async fn assign(
        &self,
        transcript_id: &str,
        course_id: &str,
        lesson_id: &str,
        method: &str,
    ) -> Result<RegistryRecord> {
        let mut record = self
            .store
            .get_record(transcript_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Registry record", transcript_id))?;

        let mut document = self
            .store
            .get_course(course_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Course", course_id))?;

        if let AssignmentState::Assigned { course_id, lesson_id } = record.state() {
            return Err(CatalogError::InvalidState(format!(
                "transcript {} is already assigned to {} / {}",
                transcript_id, course_id, lesson_id
            )));
        }

        // Every lesson with this id is checked and updated, not just the first
        let matches: Vec<_> = document
            .course
            .lessons()
            .filter(|l| l.id == lesson_id)
            .collect();
        if matches.is_empty() {
            return Err(CatalogError::not_found(
                "Lesson",
                format!("{} in course {}", lesson_id, course_id),
            ));
        }
        if let Some(bound) = matches.iter().find(|l| l.has_transcript()) {
            return Err(CatalogError::InvalidState(format!(
                "lesson {} already has a transcript: {}",
                lesson_id,
                bound.transcript_path.as_deref().unwrap_or_default()
            )));
        }
        if matches.len() > 1 {
            warn!(
                "Lesson id {} appears {} times in course {}",
                lesson_id,
                matches.len(),
                course_id
            );
        }

        document.set_lesson_transcript(lesson_id, &record.processed_path_string());
        record.mark_assigned(course_id, lesson_id, method, chrono::Utc::now().naive_utc());
        self.store.commit_assignment(&record, &document).await?;

        info!("✅ Transcript assigned: {}", transcript_id);
        info!("   Course: {}", course_id);
        info!("   Lesson: {}", lesson_id);
        Ok(record)
    }

    /// Move an assigned transcript back to the holding directory and reset
    /// the record.
    ///
    /// The course document is not touched, so the lesson keeps its old
    /// `transcript_path`.
    pub async fn unassign(&self, transcript_id: &str) -> Result<UnassignOutcome> {
        let mut record = self
            .store
            .get_record(transcript_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Registry record", transcript_id))?;

        let previous = record.state();
        if previous == AssignmentState::Unassigned {
            info!("ℹ️ Transcript '{}' is already unassigned", transcript_id);
            return Ok(UnassignOutcome::AlreadyUnassigned(record));
        }

        let moved_from = record.processed_path.clone();
        let file_name = moved_from.file_name().ok_or_else(|| {
            CatalogError::Validation(format!(
                "processed_path has no file name: {}",
                moved_from.display()
            ))
        })?;
        let target = self.unassigned_dir.join(file_name);

        info!("🔄 Unassigning transcript {} ({})", transcript_id, previous);
        self.store.move_transcript(&moved_from, &target).await?;

        record.mark_unassigned(target);
        self.store.put_record(&record).await?;

        if let AssignmentState::Assigned { course_id, lesson_id } = &previous {
            warn!(
                "Lesson {} in course {} still references {}",
                lesson_id,
                course_id,
                moved_from.display()
            );
        }

        info!("✅ Transcript unassigned: {}", transcript_id);
        Ok(UnassignOutcome::Unassigned {
            record,
            previous,
            moved_from,
        })
    }
}
