//! Task Statistics
//!
//! Display-only figures derived from the tasks on screen. The server counts
//! in `TaskListResponse` stay authoritative; these are recomputed on every
//! refetch.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub due_today: usize,
    /// Rounded to a whole percent
    pub completion_percent: u32,
    pub overdue: usize,
    pub high_priority_pending: usize,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], now: NaiveDateTime) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let completion_percent = if total == 0 {
            0
        } else {
            (completed as f64 * 100.0 / total as f64).round() as u32
        };
        let due = |t: &Task| t.due_date.as_deref().and_then(parse_due);

        Self {
            total,
            completed,
            pending: total - completed,
            due_today: tasks
                .iter()
                .filter(|t| due(t).is_some_and(|d| d.date() == now.date()))
                .count(),
            completion_percent,
            overdue: tasks
                .iter()
                .filter(|t| !t.completed && due(t).is_some_and(|d| d < now))
                .count(),
            high_priority_pending: tasks
                .iter()
                .filter(|t| !t.completed && t.priority == Priority::High)
                .count(),
        }
    }
}

/// Backend due dates: naive ISO timestamps, optionally with an offset or
/// fractional seconds, or a bare date (midnight)
pub fn parse_due(s: &str) -> Option<NaiveDateTime> {
    if let Ok(at) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(at.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(s, format) {
            return Some(at);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Relative label shown on a task card, counting whole days rounded up
pub fn due_label(due: NaiveDateTime, now: NaiveDateTime) -> String {
    let seconds = (due - now).num_seconds() as f64;
    let days = (seconds / 86_400.0).ceil() as i64;
    match days {
        d if d < 0 => "Overdue".to_string(),
        0 => "Due today".to_string(),
        1 => "Due tomorrow".to_string(),
        d => format!("Due in {} days", d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::task;

    fn at(s: &str) -> NaiveDateTime {
        parse_due(s).unwrap()
    }

    fn due(mut t: Task, date: &str) -> Task {
        t.due_date = Some(date.to_string());
        t
    }

    #[test]
    fn test_compute() {
        let now = at("2024-05-10T12:00:00");
        let mut urgent = task(4, false);
        urgent.priority = Priority::High;
        let tasks = vec![
            due(task(1, false), "2024-05-10T18:00:00"),
            due(task(2, false), "2024-05-09T09:00:00"),
            due(task(3, true), "2024-05-01T09:00:00"),
            urgent,
        ];

        let stats = TaskStats::compute(&tasks, now);

        assert_eq!(
            stats,
            TaskStats {
                total: 4,
                completed: 1,
                pending: 3,
                due_today: 1,
                completion_percent: 25,
                overdue: 1,
                high_priority_pending: 1,
            }
        );
    }

    #[test]
    fn test_empty_list() {
        let stats = TaskStats::compute(&[], at("2024-05-10T12:00:00"));
        assert_eq!(stats, TaskStats::default());
    }

    #[test]
    fn test_percent_rounds() {
        let tasks = vec![task(1, true), task(2, true), task(3, false)];
        assert_eq!(TaskStats::compute(&tasks, at("2024-05-10")).completion_percent, 67);
    }

    #[test]
    fn test_parse_due_formats() {
        assert_eq!(at("2024-05-10"), at("2024-05-10T00:00:00"));
        assert_eq!(at("2024-05-10T08:30"), at("2024-05-10T08:30:00.000"));
        assert!(parse_due("tomorrow").is_none());
    }

    #[test]
    fn test_due_label() {
        let now = at("2024-05-10T12:00:00");
        assert_eq!(due_label(at("2024-05-09T12:00:00"), now), "Overdue");
        assert_eq!(due_label(at("2024-05-10T11:00:00"), now), "Due today");
        assert_eq!(due_label(at("2024-05-10T18:00:00"), now), "Due tomorrow");
        assert_eq!(due_label(at("2024-05-13T12:00:00"), now), "Due in 3 days");
    }
}
