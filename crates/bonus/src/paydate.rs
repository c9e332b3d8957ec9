//! Pay dates and work weeks.
//!
//! Bonuses are paid on the Tuesday after the Saturday that closes a job's
//! completion week. A pay period is the Sunday–Saturday week before the
//! week containing the pay date.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::model::JobRecord;

/// Days from the closing Saturday to payday (Tuesday).
const SATURDAY_TO_PAYDAY: i64 = 3;

/// Resolved pay date for a job, or `None` when nothing dates it.
pub fn pay_date_for(job: &JobRecord) -> Option<NaiveDate> {
    if let Some(date) = job.pay_date {
        return Some(date);
    }
    if let Some(paid_at) = job.bonus_paid_at {
        return Some(paid_at.date_naive());
    }
    job.completed_on().and_then(payday_after)
}

/// The Tuesday following the Saturday that ends `completed`'s week.
/// `None` when that falls past the last representable date.
pub fn payday_after(completed: NaiveDate) -> Option<NaiveDate> {
    let to_saturday = 6 - i64::from(completed.weekday().num_days_from_sunday());
    completed.checked_add_signed(Duration::days(to_saturday + SATURDAY_TO_PAYDAY))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WorkWeek {
    /// Sunday.
    pub start: NaiveDate,
    /// Saturday.
    pub end: NaiveDate,
}

impl WorkWeek {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WorkWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Work Week: {} - {}",
            self.start.format("%m/%d/%Y"),
            self.end.format("%m/%d/%Y")
        )
    }
}

/// Work week paid out on `pay_date`, or `None` before the first
/// representable week.
pub fn work_week_for(pay_date: NaiveDate) -> Option<WorkWeek> {
    let back_to_sunday = i64::from(pay_date.weekday().num_days_from_sunday());
    let start = pay_date.checked_sub_signed(Duration::days(back_to_sunday + 7))?;
    let end = start.checked_add_signed(Duration::days(6))?;
    Some(WorkWeek { start, end })
}

/// Distinct work weeks across the jobs, most recent first.
pub fn work_weeks(jobs: &[JobRecord]) -> Vec<WorkWeek> {
    let weeks: BTreeSet<WorkWeek> = jobs
        .iter()
        .filter_map(pay_date_for)
        .filter_map(work_week_for)
        .collect();
    weeks.into_iter().rev().collect()
}

/// Jobs whose pay date falls in the work week starting on `start`.
pub fn jobs_in_week(jobs: &[JobRecord], start: NaiveDate) -> Vec<&JobRecord> {
    jobs.iter()
        .filter(|job| {
            pay_date_for(job)
                .and_then(work_week_for)
                .is_some_and(|week| week.start == start)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn completed(y: i32, m: u32, d: u32) -> JobRecord {
        JobRecord {
            completed_at: Some(Utc.with_ymd_and_hms(y, m, d, 15, 0, 0).unwrap()),
            ..JobRecord::default()
        }
    }

    #[test]
    fn payday_is_tuesday_after_week_close() {
        // Wed 2024-03-13 -> Sat 03-16 -> Tue 03-19
        assert_eq!(payday_after(ymd(2024, 3, 13)), Some(ymd(2024, 3, 19)));
        // Sunday starts a new week
        assert_eq!(payday_after(ymd(2024, 3, 10)), Some(ymd(2024, 3, 19)));
        // Saturday closes its own week
        assert_eq!(payday_after(ymd(2024, 3, 16)), Some(ymd(2024, 3, 19)));
    }

    #[test]
    fn pay_date_precedence() {
        let mut job = completed(2024, 3, 13);
        assert_eq!(pay_date_for(&job), Some(ymd(2024, 3, 19)));

        job.bonus_paid_at = Some(Utc.with_ymd_and_hms(2024, 3, 21, 9, 0, 0).unwrap());
        assert_eq!(pay_date_for(&job), Some(ymd(2024, 3, 21)));

        job.pay_date = Some(ymd(2024, 3, 26));
        assert_eq!(pay_date_for(&job), Some(ymd(2024, 3, 26)));

        assert_eq!(pay_date_for(&JobRecord::default()), None);
    }

    #[test]
    fn work_week_is_week_before_payday() {
        let week = work_week_for(ymd(2024, 3, 19)).unwrap();
        assert_eq!(week.start, ymd(2024, 3, 10));
        assert_eq!(week.end, ymd(2024, 3, 16));
        assert!(week.contains(ymd(2024, 3, 13)));
        assert_eq!(week.label(), "Work Week: 03/10/2024 - 03/16/2024");
    }

    #[test]
    fn completion_falls_inside_its_work_week() {
        for day in 10..=16 {
            let date = ymd(2024, 3, day);
            let week = payday_after(date).and_then(work_week_for).unwrap();
            assert!(week.contains(date), "day {day}");
        }
    }

    #[test]
    fn weeks_are_distinct_newest_first() {
        let jobs = vec![
            completed(2024, 3, 13),
            completed(2024, 3, 27),
            completed(2024, 3, 14),
            JobRecord::default(),
        ];
        let weeks = work_weeks(&jobs);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].start, ymd(2024, 3, 24));
        assert_eq!(weeks[1].start, ymd(2024, 3, 10));

        assert_eq!(jobs_in_week(&jobs, ymd(2024, 3, 10)).len(), 2);
        assert!(jobs_in_week(&jobs, ymd(2024, 3, 17)).is_empty());
    }

    #[test]
    fn dates_at_calendar_edges_are_undated() {
        assert_eq!(payday_after(NaiveDate::MAX), None);
        assert_eq!(work_week_for(NaiveDate::MIN), None);

        let job = JobRecord {
            completed_at: NaiveDate::MAX.and_hms_opt(0, 0, 0).map(|t| Utc.from_utc_datetime(&t)),
            ..JobRecord::default()
        };
        assert_eq!(pay_date_for(&job), None);
        assert!(work_weeks(std::slice::from_ref(&job)).is_empty());
    }
}
