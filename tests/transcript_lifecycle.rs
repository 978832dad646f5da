use course_atlas::{
    parse_syllabus, AssignmentEngine, CatalogError, Config, ConfigBuilder, DocumentStore,
    FileStore, TranscriptIngestor, UnassignOutcome,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

const SYLLABUS: &str = "My Course (~3 hrs)\n1. Basics\n1.1. Welcome (2:30)\n1.2. Setup (10:15)\n2. Advanced\n2.1. Deep Dive (1:02:19)\n";

const VTT: &str = "WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nSpeaker 1: Welcome to the course.\n\n00:00:04.500 --> 00:00:08.000\nSpeaker 2: Glad to be here.\n";

struct Fixture {
    temp_dir: TempDir,
    config: Config,
}

impl Fixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigBuilder::new()
            .with_project_root(temp_dir.path().to_path_buf())
            .build();

        let course = parse_syllabus(SYLLABUS).unwrap();
        let courses_dir = config.courses_dir();
        fs::create_dir_all(&courses_dir).await.unwrap();
        fs::write(courses_dir.join("my-course.json"), course.to_json_string().unwrap())
            .await
            .unwrap();

        Self { temp_dir, config }
    }

    fn store(&self) -> FileStore {
        FileStore::new(&self.config)
    }

    fn ingestor(&self) -> TranscriptIngestor<FileStore> {
        TranscriptIngestor::new(self.store(), self.config.paths.unassigned_dir.clone())
    }

    fn engine(&self) -> AssignmentEngine<FileStore> {
        AssignmentEngine::new(self.store(), self.config.paths.unassigned_dir.clone())
    }

    async fn write_raw(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, content).await.unwrap();
        path
    }

    fn abs(&self, relative: &Path) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    fn course_path(&self) -> PathBuf {
        self.config.courses_dir().join("my-course.json")
    }

    fn record_path(&self, transcript_id: &str) -> PathBuf {
        self.config.registry_dir().join(format!("{}.json", transcript_id))
    }
}

#[tokio::test]
async fn test_ingest_creates_unassigned_record() {
    let fx = Fixture::new().await;
    let raw = fx.write_raw("raw/zoom/2024/05/Welcome Call.vtt", VTT).await;

    let record = fx.ingestor().ingest(&raw, "zoom").await.unwrap();

    assert_eq!(record.transcript_id, "zoom_2024_05_welcome_call");
    assert!(!record.assigned);
    assert!(record.course_id.is_none());
    assert!(record.lesson_id.is_none());
    assert!(record.assigned_at.is_none());
    assert_eq!(
        record.processed_path,
        PathBuf::from("transcripts/processed/unassigned/zoom_2024_05_welcome_call.md")
    );

    let text = fs::read_to_string(fx.abs(&record.processed_path)).await.unwrap();
    assert_eq!(text, "Speaker 1: Welcome to the course.\nSpeaker 2: Glad to be here.");

    let stored = fx.store().get_record(&record.transcript_id).await.unwrap().unwrap();
    assert_eq!(stored, record);

    let json = fs::read_to_string(fx.record_path(&record.transcript_id)).await.unwrap();
    assert!(json.contains("\n  \"assigned\": false"));
    assert!(json.contains("\"assignment_method\": null"));
}

#[tokio::test]
async fn test_duplicate_ingestion_is_rejected() {
    let fx = Fixture::new().await;
    let raw = fx.write_raw("raw/notes.txt", "  some text  ").await;

    fx.ingestor().ingest(&raw, "descript").await.unwrap();
    let err = fx.ingestor().ingest(&raw, "descript").await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidState(_)));
}

#[tokio::test]
async fn test_ingest_missing_raw_file() {
    let fx = Fixture::new().await;
    let err = fx
        .ingestor()
        .ingest(&fx.temp_dir.path().join("nope.vtt"), "zoom")
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
}

#[tokio::test]
async fn test_assign_binds_lesson_and_record() {
    let fx = Fixture::new().await;
    let raw = fx.write_raw("raw/2024/06/intro.vtt", VTT).await;
    let ingested = fx.ingestor().ingest(&raw, "zoom").await.unwrap();

    let record = fx
        .engine()
        .assign(&ingested.transcript_id, "my-course", "my-course-01-02", "manual")
        .await
        .unwrap();

    assert!(record.assigned);
    assert_eq!(record.course_id.as_deref(), Some("my-course"));
    assert_eq!(record.lesson_id.as_deref(), Some("my-course-01-02"));
    assert_eq!(record.assignment_method.as_deref(), Some("manual"));
    assert!(record.assigned_at.is_some());
    // Assignment leaves the file where it is
    assert!(fx.abs(&record.processed_path).exists());

    let course = fx.store().get_course("my-course").await.unwrap().unwrap().course;
    let lesson = course.lessons().find(|l| l.id == "my-course-01-02").unwrap();
    assert_eq!(
        lesson.transcript_path.as_deref(),
        Some("transcripts/processed/unassigned/zoom_2024_06_intro.md")
    );
    assert_eq!(course.lessons().filter(|l| l.has_transcript()).count(), 1);
}

#[tokio::test]
async fn test_assign_preconditions_leave_files_untouched() {
    let fx = Fixture::new().await;
    let first = fx.write_raw("raw/first.txt", "first").await;
    let second = fx.write_raw("raw/second.txt", "second").await;
    let first = fx.ingestor().ingest(&first, "zoom").await.unwrap();
    let second = fx.ingestor().ingest(&second, "zoom").await.unwrap();

    let engine = fx.engine();
    engine
        .assign(&first.transcript_id, "my-course", "my-course-01-01", "manual")
        .await
        .unwrap();

    let course_before = fs::read_to_string(fx.course_path()).await.unwrap();
    let first_before = fs::read_to_string(fx.record_path(&first.transcript_id)).await.unwrap();
    let second_before = fs::read_to_string(fx.record_path(&second.transcript_id)).await.unwrap();

    // Lesson already has a transcript
    let err = engine
        .assign(&second.transcript_id, "my-course", "my-course-01-01", "manual")
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidState(_)));

    // Same transcript twice
    let err = engine
        .assign(&first.transcript_id, "my-course", "my-course-02-01", "manual")
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidState(_)));

    // Unknown lesson, course and transcript
    let err = engine
        .assign(&second.transcript_id, "my-course", "my-course-09-09", "manual")
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { kind: "Lesson", .. }));

    let err = engine
        .assign(&second.transcript_id, "other-course", "my-course-01-02", "manual")
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { kind: "Course", .. }));

    let err = engine
        .assign("zoom_unknown_missing", "my-course", "my-course-01-02", "manual")
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { kind: "Registry record", .. }));

    assert_eq!(fs::read_to_string(fx.course_path()).await.unwrap(), course_before);
    assert_eq!(
        fs::read_to_string(fx.record_path(&first.transcript_id)).await.unwrap(),
        first_before
    );
    assert_eq!(
        fs::read_to_string(fx.record_path(&second.transcript_id)).await.unwrap(),
        second_before
    );
}

#[tokio::test]
async fn test_assign_updates_every_lesson_with_matching_id() {
    let fx = Fixture::new().await;

    let mut course = parse_syllabus(SYLLABUS).unwrap();
    course.sections[1].lessons[0].id = "my-course-01-01".to_string();
    fs::write(fx.course_path(), course.to_json_string().unwrap())
        .await
        .unwrap();

    let raw = fx.write_raw("raw/dup.txt", "dup").await;
    let record = fx.ingestor().ingest(&raw, "vimeo").await.unwrap();
    fx.engine()
        .assign(&record.transcript_id, "my-course", "my-course-01-01", "manual")
        .await
        .unwrap();

    let course = fx.store().get_course("my-course").await.unwrap().unwrap().course;
    assert_eq!(course.lessons().filter(|l| l.has_transcript()).count(), 2);
}

#[tokio::test]
async fn test_unassign_of_unassigned_record_is_noop() {
    let fx = Fixture::new().await;
    let raw = fx.write_raw("raw/idle.txt", "idle").await;
    let record = fx.ingestor().ingest(&raw, "zoom").await.unwrap();
    let before = fs::read_to_string(fx.record_path(&record.transcript_id)).await.unwrap();

    let outcome = fx.engine().unassign(&record.transcript_id).await.unwrap();

    match outcome {
        UnassignOutcome::AlreadyUnassigned(current) => {
            assert!(current.assigned_at.is_none());
            assert!(current.course_id.is_none());
            assert!(current.lesson_id.is_none());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(
        fs::read_to_string(fx.record_path(&record.transcript_id)).await.unwrap(),
        before
    );
    assert!(fx.abs(&record.processed_path).exists());
}

#[tokio::test]
async fn test_unassign_unknown_transcript() {
    let fx = Fixture::new().await;
    let err = fx.engine().unassign("zoom_unknown_ghost").await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
}

#[tokio::test]
async fn test_ingest_assign_unassign_round_trip() {
    let fx = Fixture::new().await;
    let raw = fx.write_raw("raw/zoom/2024/05/Deep Dive.vtt", VTT).await;
    let ingested = fx.ingestor().ingest(&raw, "zoom").await.unwrap();
    let original_text = fs::read_to_string(fx.abs(&ingested.processed_path)).await.unwrap();

    let engine = fx.engine();
    engine
        .assign(&ingested.transcript_id, "my-course", "my-course-02-01", "manual")
        .await
        .unwrap();

    // Relocate the transcript next to its lesson, as an operator would
    let store = fx.store();
    let mut record = store.get_record(&ingested.transcript_id).await.unwrap().unwrap();
    let lesson_copy = PathBuf::from("courses/my-course/02-01/transcript.md");
    store
        .move_transcript(&record.processed_path, &lesson_copy)
        .await
        .unwrap();
    record.processed_path = lesson_copy.clone();
    store.put_record(&record).await.unwrap();

    let outcome = engine.unassign(&ingested.transcript_id).await.unwrap();
    let record = match outcome {
        UnassignOutcome::Unassigned {
            record, moved_from, ..
        } => {
            assert_eq!(moved_from, lesson_copy);
            record
        }
        other => panic!("unexpected outcome: {:?}", other),
    };

    assert!(!record.assigned);
    assert!(record.course_id.is_none());
    assert!(record.lesson_id.is_none());
    assert!(record.assignment_method.is_none());
    assert_eq!(
        record.processed_path,
        PathBuf::from("transcripts/processed/unassigned/transcript.md")
    );
    assert!(!fx.abs(&lesson_copy).exists());
    assert_eq!(
        fs::read_to_string(fx.abs(&record.processed_path)).await.unwrap(),
        original_text
    );

    let stored = store.get_record(&ingested.transcript_id).await.unwrap().unwrap();
    assert_eq!(stored, record);
}

#[tokio::test]
async fn test_unassign_leaves_course_document_untouched() {
    let fx = Fixture::new().await;
    let raw = fx.write_raw("raw/setup.txt", "setup walkthrough").await;
    let ingested = fx.ingestor().ingest(&raw, "zoom").await.unwrap();

    let engine = fx.engine();
    engine
        .assign(&ingested.transcript_id, "my-course", "my-course-01-02", "manual")
        .await
        .unwrap();
    let course_after_assign = fs::read_to_string(fx.course_path()).await.unwrap();

    engine.unassign(&ingested.transcript_id).await.unwrap();

    assert_eq!(
        fs::read_to_string(fx.course_path()).await.unwrap(),
        course_after_assign
    );
    let course = fx.store().get_course("my-course").await.unwrap().unwrap().course;
    let lesson = course.lessons().find(|l| l.id == "my-course-01-02").unwrap();
    assert!(lesson.has_transcript());

    // The stale path blocks reassignment to the same lesson
    let err = engine
        .assign(&ingested.transcript_id, "my-course", "my-course-01-02", "manual")
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidState(_)));
}

#[tokio::test]
async fn test_assign_rewrites_only_the_transcript_path() {
    let fx = Fixture::new().await;
    let stored = json!({
        "id": "my-course",
        "title": "My Course",
        "tagline": "Breathe better",
        "instructor": "Dr. Rivera",
        "sections": [{
            "id": "my-course-01",
            "number": "01",
            "title": "Basics",
            "lessons": [
                {
                    "id": "my-course-01-01",
                    "number": "01.01",
                    "title": "Welcome",
                    "type": "video",
                    "video_url": "https://vimeo.com/1",
                    "duration_seconds": 150,
                    "attachments": [
                        {"filename": "workbook.pdf", "path": "assets/workbook.pdf"}
                    ],
                    "chapter_markers": [{"timestamp": "00:30", "title": "Intro"}],
                    "notes": "keep me"
                },
                {
                    "id": "my-course-01-02",
                    "number": "01.02",
                    "title": "Setup",
                    "type": "text"
                }
            ]
        }]
    });
    fs::write(fx.course_path(), serde_json::to_string_pretty(&stored).unwrap())
        .await
        .unwrap();

    let raw = fx.write_raw("raw/2024/07/setup.txt", "setup").await;
    let record = fx.ingestor().ingest(&raw, "zoom").await.unwrap();
    fx.engine()
        .assign(&record.transcript_id, "my-course", "my-course-01-02", "manual")
        .await
        .unwrap();

    let mut expected = stored;
    expected["sections"][0]["lessons"][1]["transcript_path"] =
        json!("transcripts/processed/unassigned/zoom_2024_07_setup.md");
    assert_eq!(
        fs::read_to_string(fx.course_path()).await.unwrap(),
        serde_json::to_string_pretty(&expected).unwrap()
    );
}

#[tokio::test]
async fn test_assign_writes_the_file_it_read() {
    let fx = Fixture::new().await;
    let courses_dir = fx.config.courses_dir();
    fs::remove_file(fx.course_path()).await.unwrap();

    let old = serde_json::to_string_pretty(&json!({
        "id": "dup",
        "title": "Old",
        "sections": [{"id": "dup-01", "number": "01", "title": "A", "lessons": [
            {"id": "dup-01-01", "number": "01.01", "title": "Old Lesson", "type": "video"}
        ]}]
    }))
    .unwrap();
    let new = old.replace("\"Old\"", "\"New\"");
    fs::write(courses_dir.join("a-old.json"), &old).await.unwrap();
    fs::write(courses_dir.join("b-new.json"), &new).await.unwrap();

    let raw = fx.write_raw("raw/dup-course.txt", "dup").await;
    let record = fx.ingestor().ingest(&raw, "zoom").await.unwrap();
    fx.engine()
        .assign(&record.transcript_id, "b-new", "dup-01-01", "manual")
        .await
        .unwrap();

    assert_eq!(fs::read_to_string(courses_dir.join("a-old.json")).await.unwrap(), old);
    let document = fx.store().get_course("b-new").await.unwrap().unwrap();
    assert_eq!(document.path, courses_dir.join("b-new.json"));
    assert_eq!(document.course.title, "New");
    assert!(document.course.lessons().all(|l| l.has_transcript()));
}

#[tokio::test]
async fn test_ingest_rejects_source_with_path_separator() {
    let fx = Fixture::new().await;
    let raw = fx.write_raw("raw/call.txt", "hello").await;

    let err = fx.ingestor().ingest(&raw, "../zoom").await.unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    assert!(!fx.temp_dir.path().join("transcripts").exists());
}
