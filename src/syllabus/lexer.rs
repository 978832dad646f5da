//! Line classifier for syllabus text
//!
//! Each trimmed line is matched against an ordered rule list and turned into
//! a [`SyllabusLine`]. Section headers win over lesson headers; a line that
//! matches neither is ignored.

use regex::Regex;
use std::sync::OnceLock;

static SECTION_RE: OnceLock<Regex> = OnceLock::new();
static LESSON_RE: OnceLock<Regex> = OnceLock::new();
static DURATION_RE: OnceLock<Regex> = OnceLock::new();
static HOURS_RE: OnceLock<Regex> = OnceLock::new();

/// `1. Basics`
fn section_re() -> &'static Regex {
    SECTION_RE.get_or_init(|| Regex::new(r"^([0-9]+)\.\s+(.*)$").expect("section pattern compiles"))
}

/// `1.2. Setup (10:15)`
fn lesson_re() -> &'static Regex {
    LESSON_RE.get_or_init(|| {
        Regex::new(r"^([0-9]+)\.([0-9]+)\.\s+(.*)$").expect("lesson pattern compiles")
    })
}

/// `(MM:SS)` or `(HH:MM:SS)` at the end of a title
fn duration_re() -> &'static Regex {
    DURATION_RE.get_or_init(|| {
        Regex::new(r"\(([0-9]+):([0-9]+)(?::([0-9]+))?\)$").expect("duration pattern compiles")
    })
}

/// `(~40 hrs)`, `(about 3 hr)`, `(12 HRS)` at the end of a course title
fn hours_re() -> &'static Regex {
    HOURS_RE.get_or_init(|| {
        Regex::new(r"(?i)\(\s*(?:~\s*|about\s+)?[0-9]+(?:\.[0-9]+)?\s*hrs?\s*\)\s*$")
            .expect("hours pattern compiles")
    })
}

/// One classified syllabus line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyllabusLine {
    SectionHeader {
        /// Zero-padded, at least two digits
        number: String,
        title: String,
    },
    LessonHeader {
        section_number: String,
        lesson_number: String,
        /// Title with the duration suffix removed
        title: String,
        duration_seconds: Option<u64>,
    },
    Ignored,
}

/// Classify a single trimmed line
pub fn classify_line(line: &str) -> SyllabusLine {
    if let Some(caps) = section_re().captures(line) {
        return SyllabusLine::SectionHeader {
            number: zero_pad(&caps[1]),
            title: caps[2].trim().to_string(),
        };
    }

    if let Some(caps) = lesson_re().captures(line) {
        let (title, duration_seconds) = split_duration(&caps[3]);
        return SyllabusLine::LessonHeader {
            section_number: zero_pad(&caps[1]),
            lesson_number: zero_pad(&caps[2]),
            title,
            duration_seconds,
        };
    }

    SyllabusLine::Ignored
}

/// Classify every non-empty trimmed line. The first line is the course title
/// and is returned separately.
pub fn tokenize(text: &str) -> Option<(&str, Vec<SyllabusLine>)> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let title = lines.next()?;
    Some((title, lines.map(classify_line).collect()))
}

/// Split a trailing `(MM:SS)` / `(HH:MM:SS)` off a lesson title. A suffix
/// whose fields do not fit in seconds is left in the title.
pub fn split_duration(raw_title: &str) -> (String, Option<u64>) {
    let trimmed = raw_title.trim();
    let Some(caps) = duration_re().captures(trimmed) else {
        return (trimmed.to_string(), None);
    };

    match duration_seconds(&caps) {
        Some(seconds) => {
            let start = caps.get(0).map_or(trimmed.len(), |m| m.start());
            (trimmed[..start].trim_end().to_string(), Some(seconds))
        }
        None => (trimmed.to_string(), None),
    }
}

fn duration_seconds(caps: &regex::Captures<'_>) -> Option<u64> {
    let first: u64 = caps[1].parse().ok()?;
    let second: u64 = caps[2].parse().ok()?;
    match caps.get(3) {
        Some(third) => {
            let third: u64 = third.as_str().parse().ok()?;
            first
                .checked_mul(3600)?
                .checked_add(second.checked_mul(60)?)?
                .checked_add(third)
        }
        None => first.checked_mul(60)?.checked_add(second),
    }
}

/// Remove a trailing hour estimate from the raw course title
pub fn strip_hours(raw_title: &str) -> String {
    hours_re().replace(raw_title, "").trim().to_string()
}

/// Lowercase ASCII slug: non-ASCII text is transliterated first, then
/// non-alphanumeric runs become one hyphen, no leading or trailing hyphen
pub fn slugify(value: &str) -> String {
    deunicode::deunicode(value)
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// `1` -> `01`, `10` -> `10`, `123` -> `123`
fn zero_pad(number: &str) -> String {
    format!("{:0>2}", number)
}
