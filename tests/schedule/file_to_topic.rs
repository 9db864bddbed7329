use line_publisher::testing::RecordingPublisher;
use line_publisher::{FileError, LineSource, ScheduleState, ScheduledPublisher, StopReason};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;
use tokio_test::{assert_err, assert_ok};

/// Write `contents` to a fresh file and return its directory guard and path
fn write_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.csv");
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

async fn publish_file(
    path: &Path,
    period: Duration,
) -> (Arc<RecordingPublisher>, line_publisher::Completion) {
    let recorder = Arc::new(RecordingPublisher::new());
    let source = assert_ok!(LineSource::open(path).await);
    let publisher = ScheduledPublisher::new("topic", period, source, Arc::clone(&recorder));

    assert_ok!(publisher.start());
    let completion = timeout(Duration::from_secs(5), publisher.join())
        .await
        .expect("publisher did not stop in time")
        .expect("publisher task failed");
    assert_eq!(publisher.state(), ScheduleState::Stopped);

    (recorder, completion)
}

#[tokio::test]
async fn test_two_line_file_publishes_then_stops() {
    let (_dir, path) = write_file("a\nb\n");

    let (recorder, completion) = publish_file(&path, Duration::from_millis(10)).await;

    assert_eq!(
        recorder.published(),
        vec![
            ("topic".to_string(), "a".to_string()),
            ("topic".to_string(), "b".to_string()),
        ]
    );
    assert_eq!(completion.reason, StopReason::EndOfInput);
    assert_eq!(completion.stats.ticks, 3);
}

#[tokio::test]
async fn test_empty_file_publishes_nothing() {
    let (_dir, path) = write_file("");

    let (recorder, completion) = publish_file(&path, Duration::from_millis(10)).await;

    assert!(recorder.calls().is_empty());
    assert_eq!(completion.reason, StopReason::EndOfInput);
    assert_eq!(completion.stats.ticks, 1);
}

#[tokio::test]
async fn test_n_lines_give_n_publishes_in_file_order() {
    for n in [1usize, 5, 20] {
        let lines: Vec<String> = (0..n).map(|i| format!("{i},row-{i},\"quoted\"")).collect();
        let (_dir, path) = write_file(&format!("{}\n", lines.join("\n")));

        let (recorder, completion) = publish_file(&path, Duration::from_millis(1)).await;

        let payloads: Vec<String> = recorder.published().into_iter().map(|(_, p)| p).collect();
        assert_eq!(payloads, lines, "payloads differ for {n} lines");
        assert_eq!(completion.stats.published, n as u64);
        assert_eq!(completion.stats.ticks, n as u64 + 1);
    }
}

#[tokio::test]
async fn test_crlf_file_publishes_stripped_lines() {
    let (_dir, path) = write_file("x,1\r\ny,2\r\n");

    let (recorder, _) = publish_file(&path, Duration::from_millis(1)).await;

    let payloads: Vec<String> = recorder.published().into_iter().map(|(_, p)| p).collect();
    assert_eq!(payloads, vec!["x,1", "y,2"]);
}

#[tokio::test]
async fn test_invalid_utf8_line_halts_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.csv");
    std::fs::write(&path, b"good\n\xff\nnever\n").unwrap();

    let (recorder, completion) = publish_file(&path, Duration::from_millis(1)).await;

    let payloads: Vec<String> = recorder.published().into_iter().map(|(_, p)| p).collect();
    assert_eq!(payloads, vec!["good"]);
    assert_eq!(completion.reason, StopReason::ReadFailure);
}

#[tokio::test]
async fn test_nonexistent_path_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.csv");

    let err = assert_err!(LineSource::open(&path).await);
    assert!(matches!(err, FileError::NotFound { .. }));
}
