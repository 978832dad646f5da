//! Loading and bulk validation of course documents

use super::{Course, CourseDocument};
use crate::error::{CatalogError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of validating every course document under a directory
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Per-file result in discovery order; `Err` carries the first violation
    pub files: Vec<(PathBuf, std::result::Result<(), String>)>,
}

impl ValidationReport {
    pub fn valid_count(&self) -> usize {
        self.files.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.files.len() - self.valid_count()
    }

    pub fn all_valid(&self) -> bool {
        self.invalid_count() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Read and validate a single course document, keeping the stored JSON
pub async fn load_course_document(path: &Path) -> Result<CourseDocument> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::io(path, e))?;
    CourseDocument::from_json_str(path, &content).map_err(|e| match e {
        CatalogError::Validation(msg) => {
            CatalogError::Validation(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Read and validate a single course document
pub async fn load_course_file(path: &Path) -> Result<Course> {
    Ok(load_course_document(path).await?.course)
}

/// Load every `*.json` directly inside `courses_dir`, sorted by file name.
/// A missing directory yields an empty catalog; an invalid document is an error.
pub async fn load_all_courses(courses_dir: &Path) -> Result<Vec<Course>> {
    let files = json_files(courses_dir).await?;
    let mut courses = Vec::with_capacity(files.len());

    for file in files {
        courses.push(load_course_file(&file).await?);
    }

    debug!("📚 Loaded {} courses from {}", courses.len(), courses_dir.display());
    Ok(courses)
}

/// Sorted `*.json` files directly inside a directory
pub(crate) async fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| CatalogError::io(dir, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CatalogError::io(dir, e))?
    {
        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Validate every `*.json` below `courses_dir` (recursively). Individual
/// failures are collected, never propagated.
pub async fn validate_all_courses(courses_dir: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();

    if !courses_dir.exists() {
        warn!("Course directory does not exist: {}", courses_dir.display());
        return Ok(report);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(courses_dir).min_depth(1) {
        let entry = entry.map_err(|e| {
            CatalogError::io(courses_dir, std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().map_or(false, |ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();

    for file in files {
        let outcome = match load_course_file(&file).await {
            Ok(course) => {
                debug!("✔ {} ({} lessons)", file.display(), course.lesson_count());
                Ok(())
            }
            Err(e) => {
                warn!("✘ {}: {}", file.display(), e);
                Err(e.to_string())
            }
        };
        report.files.push((file, outcome));
    }

    info!(
        "📋 Validated {} course files: {} valid, {} invalid",
        report.files.len(),
        report.valid_count(),
        report.invalid_count()
    );
    Ok(report)
}
