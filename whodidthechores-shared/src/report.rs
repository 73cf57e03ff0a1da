/// Chore × user effort matrix
///
/// The grouping query ([`crate::models::Task::sum_by_chore_and_user`]) already
/// sums minutes per (chore, user) pair; [`build_report`] only reshapes those
/// rows into the structure the chart renderer consumes:
///
/// ```text
/// report: { "Dishes": { "alice": 50, "bob": 15 }, "Laundry": { "bob": 40 } }
/// chores: ["Dishes", "Laundry"]
/// users:  ["alice", "bob"]
/// ```
///
/// Pairs with no task are absent rather than zero. Output does not depend on
/// the order of the input rows.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// One (chore, user) pair with its summed minutes
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ReportRow {
    pub chore_name: String,
    pub user_name: String,
    pub minutes: i64,
}

/// Report matrix plus sorted axis labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChoreReport {
    /// chore name → user name → minutes
    pub report: BTreeMap<String, BTreeMap<String, i64>>,

    /// Distinct chore names, case-insensitive order
    pub chores: Vec<String>,

    /// Distinct user names, case-insensitive order
    pub users: Vec<String>,
}

impl ChoreReport {
    pub fn is_empty(&self) -> bool {
        self.report.is_empty()
    }

    /// Minutes for one cell, `None` when the pair has no task
    pub fn minutes(&self, chore: &str, user: &str) -> Option<i64> {
        self.report.get(chore).and_then(|users| users.get(user)).copied()
    }

    /// Total minutes per user over every chore
    pub fn totals_by_user(&self) -> BTreeMap<String, i64> {
        let mut totals = BTreeMap::new();
        for users in self.report.values() {
            for (user, minutes) in users {
                *totals.entry(user.clone()).or_insert(0) += minutes;
            }
        }
        totals
    }

    /// Total minutes per chore over every user
    pub fn totals_by_chore(&self) -> BTreeMap<String, i64> {
        self.report
            .iter()
            .map(|(chore, users)| (chore.clone(), users.values().sum()))
            .collect()
    }
}

/// Builds the matrix from pre-summed rows
///
/// Should a pair appear twice its minutes are added, which keeps the result
/// independent of row order.
pub fn build_report<I>(rows: I) -> ChoreReport
where
    I: IntoIterator<Item = ReportRow>,
{
    let mut report: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
    let mut users: Vec<String> = Vec::new();

    for row in rows {
        let cell = report
            .entry(row.chore_name)
            .or_default()
            .entry(row.user_name.clone())
            .or_insert(0);
        *cell = cell.saturating_add(row.minutes);

        users.push(row.user_name);
    }

    let mut chores: Vec<String> = report.keys().cloned().collect();
    chores.sort_by(|a, b| case_insensitive(a, b));

    users.sort_by(|a, b| case_insensitive(a, b));
    users.dedup();

    ChoreReport {
        report,
        chores,
        users,
    }
}

/// Case-insensitive order, ties broken by exact comparison
fn case_insensitive(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Reporting interval; both ends are inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The calendar month containing `now`, in `tz`
    ///
    /// From the first day at 00:00 to the last day at 23:59:59 local time.
    pub fn current_month<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Self {
        let local = now.with_timezone(tz);
        let first = NaiveDate::from_ymd_opt(local.year(), local.month(), 1)
            .unwrap_or(NaiveDate::MIN);
        let next = first.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX);

        let start = local_midnight(first, tz);
        let end = local_midnight(next, tz) - chrono::Duration::seconds(1);

        Self { start, end }
    }
}

/// Start of `date` in `tz`, as UTC
///
/// Where a DST jump skips midnight the day starts at the first local time
/// that exists, i.e. the end of the gap. Gaps are whole quarter hours.
fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    (0..=24 * 4)
        .map(|quarter| midnight + chrono::Duration::minutes(15 * quarter))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
