//! Querying logged workouts.

use crate::{Result, WorkoutLog};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Criteria for selecting logs; unset fields match everything
#[derive(Clone, Debug, Default)]
pub struct LogFilter {
    pub day_id: Option<String>,
    pub user_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl LogFilter {
    pub fn matches(&self, log: &WorkoutLog) -> bool {
        self.day_id.as_deref().map_or(true, |d| log.day_id == d)
            && self.user_id.as_deref().map_or(true, |u| log.user_id == u)
            && self.since.map_or(true, |t| log.completed_at >= t)
    }
}

/// Load logs matching `filter` from the WAL, newest first
pub fn query_logs(wal_path: &Path, filter: &LogFilter) -> Result<Vec<WorkoutLog>> {
    let mut logs: Vec<WorkoutLog> = crate::wal::read_logs(wal_path)?
        .into_iter()
        .filter(|log| filter.matches(log))
        .collect();

    logs.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    if let Some(limit) = filter.limit {
        logs.truncate(limit);
    }

    tracing::debug!("Query matched {} workouts", logs.len());
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::tests::create_test_log;
    use crate::wal::{JsonlSink, LogSink};
    use chrono::Duration;

    fn write_logs(path: &Path, logs: &[WorkoutLog]) {
        let mut sink = JsonlSink::new(path);
        for log in logs {
            sink.append(log).unwrap();
        }
    }

    #[test]
    fn test_query_newest_first_with_limit() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");

        let now = Utc::now();
        let logs: Vec<_> = (0..4)
            .map(|i| {
                let mut log = create_test_log("lower_a");
                log.completed_at = now - Duration::days(i);
                log
            })
            .collect();
        write_logs(&wal_path, &logs);

        let filter = LogFilter {
            limit: Some(2),
            ..LogFilter::default()
        };
        let found = query_logs(&wal_path, &filter).unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, logs[0].id);
        assert_eq!(found[1].id, logs[1].id);
    }

    #[test]
    fn test_filter_by_day_user_and_time() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");

        let now = Utc::now();
        let mut old = create_test_log("lower_a");
        old.completed_at = now - Duration::days(30);
        let recent = create_test_log("lower_a");
        let other_day = create_test_log("upper_a");
        let mut other_user = create_test_log("lower_a");
        other_user.user_id = "someone_else".into();
        write_logs(&wal_path, &[old, recent.clone(), other_day, other_user]);

        let filter = LogFilter {
            day_id: Some("lower_a".into()),
            user_id: Some("local".into()),
            since: Some(now - Duration::days(7)),
            limit: None,
        };
        let found = query_logs(&wal_path, &filter).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, recent.id);
    }

    #[test]
    fn test_query_missing_wal_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let found = query_logs(&temp_dir.path().join("none.wal"), &LogFilter::default()).unwrap();
        assert!(found.is_empty());
    }
}
