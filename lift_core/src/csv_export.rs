//! CSV export of logged workouts.
//!
//! The WAL stays the source of truth. Each export rewrites the CSV with one
//! row per logged set, via a temp file persisted over the destination.

use crate::{Error, Result, WorkoutLog};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    log_id: String,
    user_id: &'a str,
    day_id: &'a str,
    completed_at: String,
    position: usize,
    exercise_id: &'a str,
    set_number: u32,
    weight: Option<f64>,
    reps: Option<u32>,
    duration_seconds: Option<u32>,
    completed: bool,
}

fn rows(log: &WorkoutLog) -> impl Iterator<Item = CsvRow<'_>> {
    let log_id = log.id.to_string();
    let completed_at = log.completed_at.to_rfc3339();

    log.exercises.iter().flat_map(move |exercise| {
        let log_id = log_id.clone();
        let completed_at = completed_at.clone();
        exercise.sets.iter().map(move |set| CsvRow {
            log_id: log_id.clone(),
            user_id: &log.user_id,
            day_id: &log.day_id,
            completed_at: completed_at.clone(),
            position: exercise.position,
            exercise_id: &exercise.exercise_id,
            set_number: set.set_number,
            weight: set.weight,
            reps: set.reps,
            duration_seconds: set.duration_seconds,
            completed: set.completed,
        })
    })
}

/// Export every workout in the WAL to `csv_path`.
///
/// Returns the number of set rows written.
pub fn export_csv(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let logs = crate::wal::read_logs(wal_path)?;

    let parent = match csv_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    let mut writer = csv::Writer::from_writer(temp.as_file());

    let mut count = 0;
    for log in &logs {
        for row in rows(log) {
            writer.serialize(row)?;
            count += 1;
        }
    }

    writer.flush()?;
    drop(writer);
    temp.as_file().sync_all()?;
    temp.persist(csv_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!(
        "Exported {} sets from {} workouts to {:?}",
        count,
        logs.len(),
        csv_path
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::tests::create_test_log;
    use crate::wal::{JsonlSink, LogSink};

    #[test]
    fn test_export_writes_one_row_per_set() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("wal/workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = JsonlSink::new(&wal_path);
        let mut log = create_test_log("lower_a");
        let mut second = log.exercises[0].sets[0].clone();
        second.set_number = 2;
        log.exercises[0].sets.push(second);
        sink.append(&log).unwrap();
        sink.append(&create_test_log("upper_a")).unwrap();

        let count = export_csv(&wal_path, &csv_path).unwrap();
        assert_eq!(count, 3);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "log_id");
        assert_eq!(&headers[5], "exercise_id");

        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][2], "lower_a");
        assert_eq!(&records[1][6], "2");
        assert_eq!(&records[2][2], "upper_a");
    }

    #[test]
    fn test_export_replaces_previous_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&create_test_log("lower_a")).unwrap();

        export_csv(&wal_path, &csv_path).unwrap();
        export_csv(&wal_path, &csv_path).unwrap();

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 1);

        // No stray temp files left beside the export
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "workouts.csv" && e.file_name() != "workouts.wal")
            .collect();
        assert!(extras.is_empty(), "unexpected files: {:?}", extras);
    }

    #[test]
    fn test_export_empty_wal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");

        let count = export_csv(&temp_dir.path().join("none.wal"), &csv_path).unwrap();
        assert_eq!(count, 0);
        assert!(csv_path.exists());
    }
}
