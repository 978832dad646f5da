//! Course Atlas
//!
//! Tooling for a JSON course catalog: parses syllabus text into course
//! documents and manages the lifecycle of lesson transcripts (ingest,
//! assign, unassign).

pub mod config;
pub mod course;
pub mod error;
pub mod store;
pub mod syllabus;
pub mod transcripts;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::course::{
    Course, CourseDocument, CourseStats, Lesson, LessonType, Section, ValidationReport,
};
pub use crate::error::{CatalogError, Result};
pub use crate::store::{DocumentStore, FileStore};
pub use crate::syllabus::{parse_syllabus, parse_syllabus_file, SyllabusLine};
pub use crate::transcripts::{
    AssignmentEngine, AssignmentState, RegistryRecord, TranscriptIngestor, UnassignOutcome,
};
