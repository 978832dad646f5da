use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static CUE_TIMING_RE: OnceLock<Regex> = OnceLock::new();

/// `00:01:02.500 --> ...` (WebVTT) or `00:01:02,500 --> ...` (SubRip),
/// hours optional
fn cue_timing_re() -> &'static Regex {
    CUE_TIMING_RE.get_or_init(|| {
        Regex::new(r"^(?:[0-9]+:)?[0-9]{2}:[0-9]{2}[.,][0-9]+\s*-->").expect("cue timing pattern compiles")
    })
}

/// Raw transcript formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    /// WebVTT subtitle track
    Vtt,
    /// SubRip subtitle track
    Srt,
    /// Anything else, treated as plain text
    Plain,
}

impl TranscriptFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("vtt") => TranscriptFormat::Vtt,
            Some("srt") => TranscriptFormat::Srt,
            _ => TranscriptFormat::Plain,
        }
    }
}

/// Normalize raw transcript text to plain lines
pub fn normalize(text: &str, format: TranscriptFormat) -> String {
    match format {
        TranscriptFormat::Vtt => normalize_subtitles(text, false),
        TranscriptFormat::Srt => normalize_subtitles(text, true),
        TranscriptFormat::Plain => text.trim().to_string(),
    }
}

/// Drop the header, cue timings and blank lines; keep the rest (speaker
/// labels included) in order. SubRip cue numbers are dropped as well.
fn normalize_subtitles(text: &str, drop_cue_numbers: bool) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !is_vtt_header(line))
        .filter(|line| !cue_timing_re().is_match(line))
        .filter(|line| !(drop_cue_numbers && line.chars().all(|c| c.is_ascii_digit())))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_vtt_header(line: &str) -> bool {
    let upper = line.to_uppercase();
    upper == "WEBVTT" || upper.starts_with("WEBVTT ") || upper.starts_with("WEBVTT\t")
}
