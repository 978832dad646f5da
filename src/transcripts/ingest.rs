use super::normalize::{normalize, TranscriptFormat};
use super::registry::{check_transcript_id, RegistryRecord};
use crate::error::{CatalogError, Result};
use crate::store::DocumentStore;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Turns raw transcript files into normalized text plus an unassigned
/// registry record
pub struct TranscriptIngestor<S> {
    store: S,
    /// Holding directory, relative to the project root
    unassigned_dir: PathBuf,
}

impl<S: DocumentStore> TranscriptIngestor<S> {
    pub fn new(store: S, unassigned_dir: PathBuf) -> Self {
        Self {
            store,
            unassigned_dir,
        }
    }

    /// Ingest one raw transcript. Refuses to overwrite an earlier ingestion
    /// of the same id.
    pub async fn ingest(&self, raw_path: &Path, source: &str) -> Result<RegistryRecord> {
        if !raw_path.is_file() {
            return Err(CatalogError::not_found(
                "Raw transcript",
                raw_path.display().to_string(),
            ));
        }

        let transcript_id = derive_transcript_id(raw_path, source);
        check_transcript_id(&transcript_id)?;
        let processed_path = self.unassigned_dir.join(format!("{}.md", transcript_id));

        if self.store.transcript_exists(&processed_path).await? {
            return Err(CatalogError::InvalidState(format!(
                "transcript already ingested: {}",
                processed_path.display()
            )));
        }
        if self.store.get_record(&transcript_id).await?.is_some() {
            return Err(CatalogError::InvalidState(format!(
                "registry record already exists: {}",
                transcript_id
            )));
        }

        let bytes = tokio::fs::read(raw_path)
            .await
            .map_err(|e| CatalogError::io(raw_path, e))?;
        let raw_text = String::from_utf8_lossy(&bytes);
        let format = TranscriptFormat::from_path(raw_path);
        let normalized = normalize(&raw_text, format);
        debug!(
            "🧹 Normalized {} ({:?}): {} → {} bytes",
            raw_path.display(),
            format,
            bytes.len(),
            normalized.len()
        );

        self.store.write_transcript(&processed_path, &normalized).await?;

        let record = RegistryRecord::new_unassigned(
            transcript_id,
            source.to_string(),
            raw_path.to_path_buf(),
            processed_path,
            chrono::Utc::now().naive_utc(),
        );
        self.store.put_record(&record).await?;

        info!("✅ Transcript ingested: {}", record.transcript_id);
        info!("   Processed: {}", record.processed_path.display());
        Ok(record)
    }
}

/// `{source}_{year_month}_{stem}` with the stem lowercased and spaces
/// replaced by underscores
pub fn derive_transcript_id(raw_path: &Path, source: &str) -> String {
    let stem = raw_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase().replace(' ', "_"))
        .unwrap_or_default();
    format!("{}_{}_{}", source, extract_year_month(raw_path), stem)
}

/// First adjacent `YYYY`, `MM` pair of path components as `YYYY_MM`,
/// otherwise `unknown`
pub fn extract_year_month(raw_path: &Path) -> String {
    let parts: Vec<String> = raw_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    parts
        .windows(2)
        .find(|pair| is_digits(&pair[0], 4) && is_digits(&pair[1], 2))
        .map(|pair| format!("{}_{}", pair[0], pair[1]))
        .unwrap_or_else(|| "unknown".to_string())
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
