use crate::error::{CatalogError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A transcript id names one file inside the registry and holding
/// directories: non-empty, no path separators, no `..`
pub fn check_transcript_id(transcript_id: &str) -> Result<()> {
    if transcript_id.is_empty()
        || transcript_id.contains(['/', '\\'])
        || transcript_id.contains("..")
    {
        return Err(CatalogError::Validation(format!(
            "invalid transcript id '{}'",
            transcript_id
        )));
    }
    Ok(())
}

/// Persisted state of one ingested transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryRecord {
    /// `{source}_{year_month}_{stem}`
    pub transcript_id: String,

    /// Free-form origin tag (zoom, descript, vimeo, ...)
    pub source: String,

    /// Raw file exactly as it was passed to ingestion
    pub raw_path: PathBuf,

    /// Normalized transcript, relative to the project root
    pub processed_path: PathBuf,

    pub assigned: bool,

    #[serde(default)]
    pub course_id: Option<String>,

    #[serde(default)]
    pub lesson_id: Option<String>,

    /// UTC, without offset
    pub ingested_at: NaiveDateTime,

    /// UTC time of the most recent assignment
    #[serde(default)]
    pub assigned_at: Option<NaiveDateTime>,

    #[serde(default)]
    pub assignment_method: Option<String>,
}

/// Lifecycle position of a registry record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentState {
    /// Sitting in the holding directory, bound to nothing
    Unassigned,
    Assigned { course_id: String, lesson_id: String },
}

impl fmt::Display for AssignmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentState::Unassigned => write!(f, "unassigned"),
            AssignmentState::Assigned { course_id, lesson_id } => {
                write!(f, "assigned to {} / {}", course_id, lesson_id)
            }
        }
    }
}

impl RegistryRecord {
    /// Fresh record in the unassigned state
    pub fn new_unassigned(
        transcript_id: String,
        source: String,
        raw_path: PathBuf,
        processed_path: PathBuf,
        ingested_at: NaiveDateTime,
    ) -> Self {
        Self {
            transcript_id,
            source,
            raw_path,
            processed_path,
            assigned: false,
            course_id: None,
            lesson_id: None,
            ingested_at,
            assigned_at: None,
            assignment_method: None,
        }
    }

    pub fn state(&self) -> AssignmentState {
        if !self.assigned {
            return AssignmentState::Unassigned;
        }
        AssignmentState::Assigned {
            course_id: self.course_id.clone().unwrap_or_default(),
            lesson_id: self.lesson_id.clone().unwrap_or_default(),
        }
    }

    pub fn mark_assigned(
        &mut self,
        course_id: &str,
        lesson_id: &str,
        method: &str,
        assigned_at: NaiveDateTime,
    ) {
        self.assigned = true;
        self.course_id = Some(course_id.to_string());
        self.lesson_id = Some(lesson_id.to_string());
        self.assigned_at = Some(assigned_at);
        self.assignment_method = Some(method.to_string());
    }

    /// Back to the holding directory. `assigned_at` keeps the last assignment time.
    pub fn mark_unassigned(&mut self, processed_path: PathBuf) {
        self.assigned = false;
        self.course_id = None;
        self.lesson_id = None;
        self.assignment_method = None;
        self.processed_path = processed_path;
    }

    /// `processed_path` as it is written into a lesson's `transcript_path`
    pub fn processed_path_string(&self) -> String {
        self.processed_path.to_string_lossy().into_owned()
    }
}
