//! Course document model
//!
//! Courses are stored as JSON documents containing ordered sections, each of
//! which contains ordered lessons. The types here mirror that layout field for
//! field so documents round-trip without reshaping.

pub mod document;
pub mod loader;
pub mod stats;

pub use document::CourseDocument;
pub use loader::{load_all_courses, load_course_document, validate_all_courses, ValidationReport};
pub use stats::{format_duration, CourseStats, LessonStatus, SectionStats};

use crate::error::{CatalogError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

/// Supporting material attached to a lesson
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Attachment {
    /// File name, e.g. workbook.pdf
    pub filename: String,
    /// What the attachment is
    #[serde(default)]
    pub description: Option<String>,
    /// Relative path in the repository
    pub path: String,
}

/// Navigation point inside a lesson's media
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ChapterMarker {
    /// `mm:ss` or `hh:mm:ss`
    pub timestamp: String,
    pub title: String,
}

/// Primary content type of a lesson
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Video,
    Audio,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Lesson {
    /// Unique within the owning course: `{course_id}-{SS}-{LL}`
    pub id: String,
    /// Order number, e.g. `01.01`
    pub number: String,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    /// Hosted media location (http or https)
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Free-form quiz reference, never resolved
    #[serde(default)]
    pub quiz: Option<String>,
    /// Processed transcript bound to this lesson
    #[serde(default)]
    pub transcript_path: Option<String>,
    #[serde(default)]
    pub chapter_markers: Option<Vec<ChapterMarker>>,
}

impl Lesson {
    /// Create a lesson with every optional field empty
    pub fn new(id: String, number: String, title: String, lesson_type: LessonType) -> Self {
        Self {
            id,
            number,
            title,
            lesson_type,
            video_url: None,
            duration_seconds: None,
            description: None,
            attachments: Vec::new(),
            quiz: None,
            transcript_path: None,
            chapter_markers: None,
        }
    }

    /// True when a non-empty transcript path is set
    pub fn has_transcript(&self) -> bool {
        self.transcript_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn has_video(&self) -> bool {
        self.video_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Section {
    /// `{course_id}-{NN}`
    pub id: String,
    /// Zero-padded order number
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Course {
    /// Slug derived from the title
    pub id: String,
    pub title: String,
    /// First syllabus line before the hour estimate was stripped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_title: Option<String>,
    /// One-line value proposition
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Course {
    /// Deserialize and validate a course document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let course: Course = serde_json::from_str(content)
            .map_err(|e| CatalogError::Validation(e.to_string()))?;
        course.validate()?;
        Ok(course)
    }

    /// Pretty JSON with two-space indentation
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the constraints serde cannot express. Stops at the first violation.
    pub fn validate(&self) -> Result<()> {
        for lesson in self.lessons() {
            if let Some(video_url) = &lesson.video_url {
                validate_http_url(video_url).map_err(|reason| {
                    CatalogError::Validation(format!(
                        "lesson {}: invalid video_url '{}': {}",
                        lesson.id, video_url, reason
                    ))
                })?;
            }
        }
        Ok(())
    }

    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.sections.iter().flat_map(|section| section.lessons.iter())
    }

    pub fn lessons_mut(&mut self) -> impl Iterator<Item = &mut Lesson> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.lessons.iter_mut())
    }

    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }
}

/// JSON Schema of the course document
pub fn course_schema() -> schemars::Schema {
    schemars::schema_for!(Course)
}

/// Write the course JSON Schema to `path`
pub async fn export_schema(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CatalogError::io(parent, e))?;
    }
    let content = serde_json::to_string_pretty(&course_schema())?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| CatalogError::io(path, e))?;
    tracing::info!("📐 Schema generated at {}", path.display());
    Ok(())
}

fn validate_http_url(value: &str) -> std::result::Result<(), String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err("missing host".to_string());
    }
    Ok(())
}
