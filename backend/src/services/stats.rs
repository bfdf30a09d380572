//! Streak and statistics engine: pure functions over snapshots of a user's
//! tasks, planned sessions and focus history.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Duration, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::focus_session::FocusSession;
use crate::models::study_session::StudySession;
use crate::models::task::Task;

/// Which planned-session field a history record's subject is compared against
/// when detecting missed sessions.
///
/// The shipped behavior compares against the planned session's *title*; the
/// subject-based variant is the corrected matching and can be swapped in
/// without touching the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissedMatchPolicy {
    #[default]
    PlannedTitle,
    PlannedSubject,
}

impl MissedMatchPolicy {
    fn planned_key<'a>(&self, session: &'a StudySession) -> &'a str {
        match self {
            MissedMatchPolicy::PlannedTitle => &session.title,
            MissedMatchPolicy::PlannedSubject => &session.subject,
        }
    }
}

/// Longest run of consecutive calendar days in `dates`. Duplicates collapse;
/// order does not matter. This is the longest streak *ever*, not a streak
/// ending today.
pub fn longest_streak(dates: impl IntoIterator<Item = NaiveDate>) -> u32 {
    let distinct: BTreeSet<NaiveDate> = dates.into_iter().collect();
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for date in distinct {
        run = match prev {
            Some(p) if date - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }
    longest
}

/// `round(100 * completed / total)`, 0 when there are no tasks.
pub fn completion_rate(completed: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    (100.0 * completed as f64 / total as f64).round() as i64
}

/// Minutes split into an `{hours, minutes}` display pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeParts {
    pub hours: i64,
    pub minutes: i64,
}

impl TimeParts {
    pub fn from_minutes(total: i64) -> Self {
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub completion_rate: i64,
    pub total_focus: TimeParts,
    pub average_session: TimeParts,
    pub longest_streak: u32,
    pub missed_sessions: usize,
}

/// Planned sessions for today whose start time has passed with no matching
/// focus record that day. Matching is by subject string per `policy`.
pub fn missed_sessions_today(
    planned_today: &[StudySession],
    history: &[FocusSession],
    now: NaiveDateTime,
    policy: MissedMatchPolicy,
) -> usize {
    let today = now.date();
    let done_subjects: HashSet<&str> = history
        .iter()
        .filter(|record| record.date == today)
        .map(|record| record.subject.as_str())
        .collect();

    planned_today
        .iter()
        .filter(|session| session.date == today)
        .filter(|session| session.start_time < now.time())
        .filter(|session| !done_subjects.contains(policy.planned_key(session)))
        .count()
}

pub fn dashboard_stats(
    tasks: &[Task],
    planned_today: &[StudySession],
    history: &[FocusSession],
    now: NaiveDateTime,
    policy: MissedMatchPolicy,
) -> DashboardStats {
    let tasks_completed = tasks.iter().filter(|t| t.completed).count();
    let tasks_total = tasks.len();

    let total_minutes: i64 = history.iter().map(|r| r.duration as i64).sum();
    let average_minutes = if history.is_empty() {
        0
    } else {
        total_minutes / history.len() as i64
    };

    DashboardStats {
        tasks_completed,
        tasks_total,
        completion_rate: completion_rate(tasks_completed, tasks_total),
        total_focus: TimeParts::from_minutes(total_minutes),
        average_session: TimeParts::from_minutes(average_minutes),
        longest_streak: longest_streak(history.iter().map(|r| r.date)),
        missed_sessions: missed_sessions_today(planned_today, history, now, policy),
    }
}

/// One day of the trailing 7-day window.
#[derive(Debug, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub weekday: String,
    pub minutes: i64,
    pub sessions: usize,
}

/// Today and the six days before it, oldest first.
pub fn week_buckets(history: &[FocusSession], today: NaiveDate) -> Vec<DayBucket> {
    (0..7)
        .map(|i| {
            let date = today - Duration::days(6 - i);
            let day_records = history.iter().filter(|r| r.date == date);
            let mut minutes = 0i64;
            let mut sessions = 0usize;
            for record in day_records {
                minutes += record.duration as i64;
                sessions += 1;
            }
            DayBucket {
                date,
                weekday: date.format("%a").to_string(),
                minutes,
                sessions,
            }
        })
        .collect()
}

/// Total minutes per subject across the given history.
pub fn subject_minutes(history: &[FocusSession]) -> BTreeMap<String, i64> {
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for record in history {
        *totals.entry(record.subject.clone()).or_default() += record.duration as i64;
    }
    totals
}

/// Fabricated monthly task counts backing the progress page's long-range
/// chart. The UI has no real monthly history yet; the `synthetic` flag marks
/// the series as placeholder data, never analytics.
#[derive(Debug, Serialize)]
pub struct MonthlyTaskOverview {
    pub synthetic: bool,
    pub months: Vec<MonthlyTaskPoint>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyTaskPoint {
    pub month: String,
    pub completed: u32,
    pub total: u32,
}

const PLACEHOLDER_MONTHLY_COUNTS: [(u32, u32); 5] = [(12, 15), (18, 22), (9, 14), (20, 24), (16, 19)];

pub fn placeholder_monthly_overview(today: NaiveDate) -> MonthlyTaskOverview {
    let months = PLACEHOLDER_MONTHLY_COUNTS
        .iter()
        .enumerate()
        .map(|(i, &(completed, total))| {
            let offset = (PLACEHOLDER_MONTHLY_COUNTS.len() - 1 - i) as u32;
            let month = today
                .checked_sub_months(Months::new(offset))
                .unwrap_or(today)
                .format("%b")
                .to_string();
            MonthlyTaskPoint {
                month,
                completed,
                total,
            }
        })
        .collect();
    MonthlyTaskOverview {
        synthetic: true,
        months,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub completion_rate: i64,
    pub total_focus: TimeParts,
    pub distinct_subjects: usize,
    pub longest_streak: u32,
    pub subject_minutes: BTreeMap<String, i64>,
    pub week: Vec<DayBucket>,
    pub monthly_task_overview: MonthlyTaskOverview,
}

pub fn progress_stats(tasks: &[Task], history: &[FocusSession], today: NaiveDate) -> ProgressStats {
    let tasks_completed = tasks.iter().filter(|t| t.completed).count();
    let tasks_total = tasks.len();
    let total_minutes: i64 = history.iter().map(|r| r.duration as i64).sum();
    let by_subject = subject_minutes(history);

    ProgressStats {
        tasks_completed,
        tasks_total,
        completion_rate: completion_rate(tasks_completed, tasks_total),
        total_focus: TimeParts::from_minutes(total_minutes),
        distinct_subjects: by_subject.len(),
        longest_streak: longest_streak(history.iter().map(|r| r.date)),
        subject_minutes: by_subject,
        week: week_buckets(history, today),
        monthly_task_overview: placeholder_monthly_overview(today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FocusSessionId, StudySessionId, TaskId, UserId};
    use chrono::NaiveTime;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, day).unwrap()
    }

    fn focus(day: u32, subject: &str, duration: i32) -> FocusSession {
        let date = d(day);
        FocusSession {
            id: FocusSessionId(0),
            user_id: UserId(1),
            subject: subject.to_string(),
            date,
            start_time: date.and_hms_opt(9, 0, 0).unwrap(),
            end_time: Some(date.and_hms_opt(10, 0, 0).unwrap()),
            duration,
            created_at: date.and_hms_opt(10, 0, 0).unwrap(),
        }
    }

    fn planned(day: u32, title: &str, subject: &str, start_hour: u32) -> StudySession {
        let date = d(day);
        StudySession {
            id: StudySessionId(0),
            user_id: UserId(1),
            title: title.to_string(),
            subject: subject.to_string(),
            date,
            start_time: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(start_hour + 1, 0, 0).unwrap(),
            color: "blue".to_string(),
            priority: "medium".to_string(),
            notes: String::new(),
            created_at: date.and_hms_opt(0, 0, 0).unwrap(),
            updated_at: date.and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    fn task(day: u32, completed: bool) -> Task {
        let date = d(day);
        Task {
            id: TaskId(0),
            user_id: UserId(1),
            title: "task".to_string(),
            due_date: date,
            completed,
            created_at: date.and_hms_opt(0, 0, 0).unwrap(),
            updated_at: date.and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn streak_empty_is_zero() {
        assert_eq!(longest_streak(std::iter::empty()), 0);
    }

    #[test]
    fn streak_single_date_is_one() {
        assert_eq!(longest_streak([d(5)]), 1);
    }

    #[test]
    fn streak_counts_consecutive_days_through_gaps() {
        // days 1,2,3 then a gap on day 4, then 5,6
        let dates = [d(1), d(2), d(3), d(5), d(6)];
        assert_eq!(longest_streak(dates), 3);
    }

    #[test]
    fn streak_ignores_duplicates_and_order() {
        let dates = [d(6), d(5), d(5), d(3), d(2), d(1), d(1)];
        assert_eq!(longest_streak(dates), 3);
    }

    #[test]
    fn streak_spans_month_boundary() {
        let dates = [
            NaiveDate::from_ymd_opt(2023, 10, 31).unwrap(),
            NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 11, 2).unwrap(),
        ];
        assert_eq!(longest_streak(dates), 3);
    }

    #[test]
    fn completion_rate_rounds_not_truncates() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(3, 3), 100);
    }

    #[test]
    fn time_parts_splits_minutes() {
        assert_eq!(TimeParts::from_minutes(0), TimeParts { hours: 0, minutes: 0 });
        assert_eq!(
            TimeParts::from_minutes(125),
            TimeParts {
                hours: 2,
                minutes: 5
            }
        );
    }

    #[test]
    fn missed_session_counts_past_unmatched_planned() {
        // "Calculus II" planned at 09:00, queried at 10:00, no matching record
        let now = d(26).and_hms_opt(10, 0, 0).unwrap();
        let planned_today = vec![planned(26, "Calculus II", "Math", 9)];
        let missed =
            missed_sessions_today(&planned_today, &[], now, MissedMatchPolicy::PlannedTitle);
        assert_eq!(missed, 1);
    }

    #[test]
    fn missed_session_matches_on_planned_title_not_subject() {
        let now = d(26).and_hms_opt(10, 0, 0).unwrap();
        let planned_today = vec![planned(26, "Calculus II", "Math", 9)];

        // A record whose subject equals the planned *subject* does not count
        // under the compatibility policy...
        let history = vec![focus(26, "Math", 60)];
        assert_eq!(
            missed_sessions_today(&planned_today, &history, now, MissedMatchPolicy::PlannedTitle),
            1
        );
        // ...but does under the corrected policy.
        assert_eq!(
            missed_sessions_today(
                &planned_today,
                &history,
                now,
                MissedMatchPolicy::PlannedSubject
            ),
            0
        );

        // A record whose subject equals the planned title clears it.
        let history = vec![focus(26, "Calculus II", 60)];
        assert_eq!(
            missed_sessions_today(&planned_today, &history, now, MissedMatchPolicy::PlannedTitle),
            0
        );
    }

    #[test]
    fn missed_session_ignores_future_and_other_days() {
        let now = d(26).and_hms_opt(10, 0, 0).unwrap();
        let planned_today = vec![
            planned(26, "Later", "Math", 14),  // not started yet
            planned(25, "Yesterday", "Math", 9), // wrong day
        ];
        assert_eq!(
            missed_sessions_today(&planned_today, &[], now, MissedMatchPolicy::PlannedTitle),
            0
        );
    }

    #[test]
    fn missed_session_ignores_history_from_other_days() {
        let now = d(26).and_hms_opt(10, 0, 0).unwrap();
        let planned_today = vec![planned(26, "Calculus II", "Math", 9)];
        let history = vec![focus(25, "Calculus II", 60)];
        assert_eq!(
            missed_sessions_today(&planned_today, &history, now, MissedMatchPolicy::PlannedTitle),
            1
        );
    }

    #[test]
    fn dashboard_stats_aggregates() {
        let now = d(26).and_hms_opt(12, 0, 0).unwrap();
        let tasks = vec![task(26, true), task(27, false), task(28, false)];
        let history = vec![focus(24, "Math", 50), focus(25, "Physics", 75)];
        let stats = dashboard_stats(&tasks, &[], &history, now, MissedMatchPolicy::default());

        assert_eq!(stats.tasks_completed, 1);
        assert_eq!(stats.tasks_total, 3);
        assert_eq!(stats.completion_rate, 33);
        assert_eq!(stats.total_focus, TimeParts { hours: 2, minutes: 5 });
        // 125 / 2 = 62 minutes, floored
        assert_eq!(
            stats.average_session,
            TimeParts {
                hours: 1,
                minutes: 2
            }
        );
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.missed_sessions, 0);
    }

    #[test]
    fn dashboard_stats_zero_sessions_average_is_zero() {
        let now = d(26).and_hms_opt(12, 0, 0).unwrap();
        let stats = dashboard_stats(&[], &[], &[], now, MissedMatchPolicy::default());
        assert_eq!(stats.average_session, TimeParts { hours: 0, minutes: 0 });
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.longest_streak, 0);
    }

    #[test]
    fn week_buckets_cover_trailing_window_oldest_first() {
        let today = d(26);
        let history = vec![focus(26, "Math", 30), focus(26, "Physics", 15), focus(20, "Math", 10)];
        let week = week_buckets(&history, today);

        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, d(20));
        assert_eq!(week[0].minutes, 10);
        assert_eq!(week[0].sessions, 1);
        assert_eq!(week[6].date, d(26));
        assert_eq!(week[6].minutes, 45);
        assert_eq!(week[6].sessions, 2);
        // middle days empty
        assert!(week[1..6].iter().all(|b| b.minutes == 0 && b.sessions == 0));
        assert_eq!(week[6].weekday, "Thu"); // 2023-10-26
    }

    #[test]
    fn subject_minutes_sums_per_subject() {
        let history = vec![focus(24, "Math", 50), focus(25, "Math", 25), focus(25, "Physics", 40)];
        let totals = subject_minutes(&history);
        assert_eq!(totals.get("Math"), Some(&75));
        assert_eq!(totals.get("Physics"), Some(&40));
    }

    #[test]
    fn progress_stats_counts_subjects_and_flags_placeholder() {
        let today = d(26);
        let tasks = vec![task(26, true), task(27, true)];
        let history = vec![focus(24, "Math", 50), focus(25, "Physics", 40)];
        let stats = progress_stats(&tasks, &history, today);

        assert_eq!(stats.completion_rate, 100);
        assert_eq!(stats.distinct_subjects, 2);
        assert_eq!(stats.monthly_task_overview.synthetic, true);
        assert_eq!(stats.monthly_task_overview.months.len(), 5);
        // oldest label first, current month last
        assert_eq!(stats.monthly_task_overview.months[4].month, "Oct");
        assert_eq!(stats.monthly_task_overview.months[0].month, "Jun");
    }
}
