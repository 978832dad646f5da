//! Document storage for courses, registry records and transcript text
//!
//! Two document collections (`courses`, `transcript_registry`) plus the
//! normalized transcript files they reference. Nothing here locks: callers
//! serialize command invocations themselves.

use crate::config::{Config, LockingMode};
use crate::course::loader::{json_files, load_course_document, load_course_file};
use crate::course::CourseDocument;
use crate::error::{CatalogError, Result};
use crate::transcripts::registry::check_transcript_id;
use crate::transcripts::RegistryRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_record(&self, transcript_id: &str) -> Result<Option<RegistryRecord>>;

    async fn put_record(&self, record: &RegistryRecord) -> Result<()>;

    /// The course document with this id, together with where it was found
    async fn get_course(&self, course_id: &str) -> Result<Option<CourseDocument>>;

    /// Rewrite a course document at the location it was read from
    async fn put_course(&self, document: &CourseDocument) -> Result<()>;

    /// Persist both halves of an assignment: record first, then course.
    ///
    /// Not atomic. If the second write fails the record already says
    /// "assigned" and nothing reconciles the two.
    async fn commit_assignment(
        &self,
        record: &RegistryRecord,
        document: &CourseDocument,
    ) -> Result<()> {
        self.put_record(record).await?;
        self.put_course(document).await
    }

    /// Whether a transcript file exists at a root-relative path
    async fn transcript_exists(&self, path: &Path) -> Result<bool>;

    async fn read_transcript(&self, path: &Path) -> Result<String>;

    async fn write_transcript(&self, path: &Path, text: &str) -> Result<()>;

    /// Move a transcript file between root-relative paths
    async fn move_transcript(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Flat JSON files under a project root
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    courses_dir: PathBuf,
    registry_dir: PathBuf,
    locking: LockingMode,
}

impl FileStore {
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.project_root.clone(),
            courses_dir: config.courses_dir(),
            registry_dir: config.registry_dir(),
            locking: config.store.locking,
        }
    }

    pub fn locking(&self) -> LockingMode {
        self.locking
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, transcript_id: &str) -> Result<PathBuf> {
        check_transcript_id(transcript_id)?;
        Ok(self.registry_dir.join(format!("{}.json", transcript_id)))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// `{courses_dir}/{course_id}.json` if present, otherwise the first
    /// document (by file name) whose `id` matches
    async fn locate_course(&self, course_id: &str) -> Result<Option<PathBuf>> {
        let direct = self.courses_dir.join(format!("{}.json", course_id));
        if direct.exists() {
            return Ok(Some(direct));
        }

        for file in json_files(&self.courses_dir).await? {
            match load_course_file(&file).await {
                Ok(course) if course.id == course_id => {
                    debug!("📂 Course {} found in {}", course_id, file.display());
                    return Ok(Some(file));
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable course file {}: {}", file.display(), e),
            }
        }

        Ok(None)
    }

    async fn write_file(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CatalogError::io(parent, e))?;
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|e| CatalogError::io(path, e))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn get_record(&self, transcript_id: &str) -> Result<Option<RegistryRecord>> {
        let path = self.record_path(transcript_id)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CatalogError::io(&path, e))?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn put_record(&self, record: &RegistryRecord) -> Result<()> {
        let path = self.record_path(&record.transcript_id)?;
        Self::write_file(&path, &serde_json::to_string_pretty(record)?).await?;
        debug!("💾 Saved registry record: {}", path.display());
        Ok(())
    }

    async fn get_course(&self, course_id: &str) -> Result<Option<CourseDocument>> {
        match self.locate_course(course_id).await? {
            Some(path) => Ok(Some(load_course_document(&path).await?)),
            None => Ok(None),
        }
    }

    async fn put_course(&self, document: &CourseDocument) -> Result<()> {
        Self::write_file(&document.path, &document.to_json_string()?).await?;
        debug!("💾 Saved course document: {}", document.path.display());
        Ok(())
    }

    async fn transcript_exists(&self, path: &Path) -> Result<bool> {
        Ok(self.resolve(path).exists())
    }

    async fn read_transcript(&self, path: &Path) -> Result<String> {
        let full = self.resolve(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| CatalogError::io(&full, e))
    }

    async fn write_transcript(&self, path: &Path, text: &str) -> Result<()> {
        Self::write_file(&self.resolve(path), text).await
    }

    async fn move_transcript(&self, from: &Path, to: &Path) -> Result<()> {
        let source = self.resolve(from);
        let target = self.resolve(to);

        if !source.exists() {
            return Err(CatalogError::not_found(
                "Transcript file",
                source.display().to_string(),
            ));
        }
        if source == target {
            return Ok(());
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CatalogError::io(parent, e))?;
        }
        tokio::fs::rename(&source, &target)
            .await
            .map_err(|e| CatalogError::io(&source, e))?;

        info!("📦 Moved {} → {}", source.display(), target.display());
        Ok(())
    }
}
