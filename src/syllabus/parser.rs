use super::lexer::{slugify, strip_hours, tokenize, SyllabusLine};
use crate::course::{Course, Lesson, LessonType, Section};
use crate::error::{CatalogError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Build a course document from syllabus text.
///
/// The first non-empty line is the course title. Section and lesson ids are
/// derived from the course slug and the zero-padded numbers, so the output
/// depends only on the input text.
pub fn parse_syllabus(text: &str) -> Result<Course> {
    let (raw_title, lines) = tokenize(text)
        .ok_or_else(|| CatalogError::Validation("syllabus text is empty".to_string()))?;

    let title = strip_hours(raw_title);
    let course_id = slugify(&title);

    let mut course = Course {
        id: course_id,
        title,
        raw_title: Some(raw_title.to_string()),
        tagline: None,
        description: None,
        sections: Vec::new(),
    };

    for line in lines {
        match line {
            SyllabusLine::SectionHeader { number, title } => {
                course.sections.push(Section {
                    id: format!("{}-{}", course.id, number),
                    number,
                    title,
                    lessons: Vec::new(),
                });
            }
            SyllabusLine::LessonHeader {
                section_number,
                lesson_number,
                title,
                duration_seconds,
            } => {
                let id = format!("{}-{}-{}", course.id, section_number, lesson_number);
                let Some(current) = course.sections.last_mut() else {
                    debug!("Dropping lesson {} outside of any section", id);
                    continue;
                };

                let mut lesson = Lesson::new(
                    id,
                    format!("{}.{}", section_number, lesson_number),
                    title,
                    LessonType::Video,
                );
                lesson.duration_seconds = duration_seconds;
                current.lessons.push(lesson);
            }
            SyllabusLine::Ignored => {}
        }
    }

    Ok(course)
}

/// Parse a syllabus file and write the course document as JSON
pub async fn parse_syllabus_file(input: &Path, output: &Path) -> Result<Course> {
    let text = tokio::fs::read_to_string(input)
        .await
        .map_err(|e| CatalogError::io(input, e))?;
    let course = parse_syllabus(&text)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CatalogError::io(parent, e))?;
    }

    tokio::fs::write(output, course.to_json_string()?)
        .await
        .map_err(|e| CatalogError::io(output, e))?;

    info!(
        "📝 Wrote course {} ({} sections, {} lessons) to {}",
        course.id,
        course.sections.len(),
        course.lesson_count(),
        output.display()
    );
    Ok(course)
}
