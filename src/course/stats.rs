//! Read-only catalog statistics rendered by the dashboard command

use super::{Course, Lesson};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate statistics for one course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseStats {
    pub course_id: String,
    pub title: String,
    pub sections: usize,
    pub lessons: usize,
    /// Sum of known lesson durations
    pub total_seconds: u64,
    pub missing_video_pct: f64,
    pub missing_transcript_pct: f64,
    pub section_stats: Vec<SectionStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionStats {
    pub title: String,
    pub total_seconds: u64,
    pub lessons: Vec<LessonStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonStatus {
    pub title: String,
    pub duration_seconds: Option<u64>,
    pub missing_video: bool,
    pub missing_transcript: bool,
}

impl LessonStatus {
    fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            title: lesson.title.clone(),
            duration_seconds: lesson.duration_seconds,
            missing_video: !lesson.has_video(),
            missing_transcript: !lesson.has_transcript(),
        }
    }

    /// `complete`, or the missing pieces joined with ` | `
    pub fn status_string(&self) -> String {
        let mut status = Vec::new();
        if self.missing_video {
            status.push("video missing");
        }
        if self.missing_transcript {
            status.push("transcript missing");
        }
        if status.is_empty() {
            "complete".to_string()
        } else {
            status.join(" | ")
        }
    }
}

impl CourseStats {
    pub fn from_course(course: &Course) -> Self {
        let lessons: Vec<&Lesson> = course.lessons().collect();
        let total = lessons.len();
        let missing_video = lessons.iter().filter(|l| !l.has_video()).count();
        let missing_transcript = lessons.iter().filter(|l| !l.has_transcript()).count();

        let section_stats = course
            .sections
            .iter()
            .map(|section| SectionStats {
                title: section.title.clone(),
                total_seconds: total_duration(section.lessons.iter()),
                lessons: section.lessons.iter().map(LessonStatus::from_lesson).collect(),
            })
            .collect();

        Self {
            course_id: course.id.clone(),
            title: course.title.clone(),
            sections: course.sections.len(),
            lessons: total,
            total_seconds: total_duration(lessons.iter().copied()),
            missing_video_pct: percentage(missing_video, total),
            missing_transcript_pct: percentage(missing_transcript, total),
            section_stats,
        }
    }
}

/// Sum of known durations, saturating at `u64::MAX`
fn total_duration<'a>(lessons: impl Iterator<Item = &'a Lesson>) -> u64 {
    lessons
        .filter_map(|l| l.duration_seconds)
        .fold(0u64, |total, seconds| total.saturating_add(seconds))
}

/// Share of `part` in `total`, rounded to one decimal; 0 for an empty total
fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Human duration: `1h 5m`, `12m`, or `—` when unknown or zero
pub fn format_duration(seconds: Option<u64>) -> String {
    match seconds {
        Some(seconds) if seconds > 0 => {
            let hours = seconds / 3600;
            let minutes = (seconds % 3600) / 60;
            if hours > 0 {
                format!("{}h {}m", hours, minutes)
            } else {
                format!("{}m", minutes)
            }
        }
        _ => "—".to_string(),
    }
}

impl fmt::Display for CourseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.course_id)?;
        writeln!(
            f,
            "  Sections: {} | Lessons: {} | Total Duration: {}",
            self.sections,
            self.lessons,
            format_duration(Some(self.total_seconds))
        )?;
        writeln!(
            f,
            "  Lessons w/o Video: {}% | Lessons w/o Transcript: {}%",
            self.missing_video_pct, self.missing_transcript_pct
        )?;

        for section in &self.section_stats {
            writeln!(
                f,
                "  {} · {} lessons · {}",
                section.title,
                section.lessons.len(),
                format_duration(Some(section.total_seconds))
            )?;
            for lesson in &section.lessons {
                writeln!(
                    f,
                    "    {:<48} {:>8}  {}",
                    lesson.title,
                    format_duration(lesson.duration_seconds),
                    lesson.status_string()
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{LessonType, Section};

    fn lesson(id: &str, seconds: Option<u64>, video: bool, transcript: bool) -> Lesson {
        let mut lesson = Lesson::new(id.into(), "01.01".into(), id.into(), LessonType::Video);
        lesson.duration_seconds = seconds;
        if video {
            lesson.video_url = Some("https://vimeo.com/1".into());
        }
        if transcript {
            lesson.transcript_path = Some("transcripts/processed/unassigned/t.md".into());
        }
        lesson
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "—");
        assert_eq!(format_duration(Some(0)), "—");
        assert_eq!(format_duration(Some(545)), "9m");
        assert_eq!(format_duration(Some(3739)), "1h 2m");
    }

    #[test]
    fn test_course_stats() {
        let course = Course {
            id: "c".into(),
            title: "C".into(),
            raw_title: None,
            tagline: None,
            description: None,
            sections: vec![Section {
                id: "c-01".into(),
                number: "01".into(),
                title: "One".into(),
                lessons: vec![
                    lesson("a", Some(150), true, true),
                    lesson("b", Some(615), false, true),
                    lesson("c", None, false, false),
                ],
            }],
        };

        let stats = CourseStats::from_course(&course);
        assert_eq!(stats.lessons, 3);
        assert_eq!(stats.total_seconds, 765);
        assert_eq!(stats.missing_video_pct, 66.7);
        assert_eq!(stats.missing_transcript_pct, 33.3);
        assert_eq!(stats.section_stats[0].lessons[0].status_string(), "complete");
        assert_eq!(
            stats.section_stats[0].lessons[2].status_string(),
            "video missing | transcript missing"
        );
    }

    #[test]
    fn test_huge_durations_saturate() {
        let course = Course {
            id: "h".into(),
            title: "H".into(),
            raw_title: None,
            tagline: None,
            description: None,
            sections: vec![Section {
                id: "h-01".into(),
                number: "01".into(),
                title: "One".into(),
                lessons: vec![
                    lesson("a", Some(u64::MAX), false, false),
                    lesson("b", Some(u64::MAX - 1), false, false),
                ],
            }],
        };

        let stats = CourseStats::from_course(&course);
        assert_eq!(stats.total_seconds, u64::MAX);
        assert_eq!(stats.section_stats[0].total_seconds, u64::MAX);
        assert!(!stats.to_string().is_empty());
    }

    #[test]
    fn test_empty_course_has_zero_percentages() {
        let course = Course {
            id: "e".into(),
            title: "E".into(),
            raw_title: None,
            tagline: None,
            description: None,
            sections: Vec::new(),
        };
        let stats = CourseStats::from_course(&course);
        assert_eq!(stats.missing_video_pct, 0.0);
        assert_eq!(stats.missing_transcript_pct, 0.0);
        assert!(stats.to_string().contains("Total Duration: —"));
    }
}
