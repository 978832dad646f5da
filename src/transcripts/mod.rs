//! Transcript lifecycle
//!
//! Raw transcripts are normalized into the holding directory and tracked by
//! a registry record. The assignment engine moves a record between the
//! unassigned and assigned states and writes the binding into the lesson.

pub mod assign;
pub mod ingest;
pub mod normalize;
pub mod registry;

pub use assign::{AssignmentEngine, UnassignOutcome};
pub use ingest::{derive_transcript_id, extract_year_month, TranscriptIngestor};
pub use normalize::{normalize, TranscriptFormat};
pub use registry::{check_transcript_id, AssignmentState, RegistryRecord};
