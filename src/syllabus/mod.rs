//! Syllabus parsing
//!
//! Turns line-oriented syllabus text ("1. Section", "1.1. Lesson (12:30)")
//! into a course document. Classification lives in [`lexer`]; [`parser`]
//! folds the classified lines into sections and lessons.

pub mod lexer;
pub mod parser;

pub use lexer::{classify_line, slugify, split_duration, strip_hours, SyllabusLine};
pub use parser::{parse_syllabus, parse_syllabus_file};
