//! Calendar-aware day windows and record partitioning.
//!
//! A month is split into three fixed windows: days 1-10, 11-20 and 21 to the
//! last day of the month. The last day is derived from calendar arithmetic
//! ([`YearMonth::day_count`]), so February and 30/31-day months come out
//! right without a lookup table.
//!
//! [`partition`] assigns every record to exactly one window. Records without
//! a usable timestamp, or stamped outside the reference month, are reported
//! back as [`SkippedRecord`]s instead of being placed anywhere.

use beewatch_common::{SensorRecord, YearMonth};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::ops::RangeInclusive;
use tracing::{debug, info};

/// One of the three fixed day windows of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayWindow {
    /// Days 1-10
    First,
    /// Days 11-20
    Second,
    /// Day 21 to the end of the month
    Third,
}

impl DayWindow {
    pub const ALL: [DayWindow; 3] = [DayWindow::First, DayWindow::Second, DayWindow::Third];

    /// Label used in artifact names. The third label is literal so the file
    /// name does not change with the month length.
    pub fn label(self) -> &'static str {
        match self {
            DayWindow::First => "01-10",
            DayWindow::Second => "11-20",
            DayWindow::Third => "21-XX",
        }
    }

    /// Position in [`DayWindow::ALL`]
    pub fn index(self) -> usize {
        match self {
            DayWindow::First => 0,
            DayWindow::Second => 1,
            DayWindow::Third => 2,
        }
    }

    /// Inclusive day range of the window in a month of `day_count` days
    pub fn day_range(self, day_count: u32) -> RangeInclusive<u32> {
        match self {
            DayWindow::First => 1..=10,
            DayWindow::Second => 11..=20,
            DayWindow::Third => 21..=day_count,
        }
    }

    /// Window containing a day of month
    pub fn for_day(day: u32) -> Option<Self> {
        match day {
            1..=10 => Some(DayWindow::First),
            11..=20 => Some(DayWindow::Second),
            21..=31 => Some(DayWindow::Third),
            _ => None,
        }
    }

    /// Time span covered by the window in `month`: midnight of its first day
    /// up to (excluding) midnight of the day after its last day
    pub fn bounds(self, month: YearMonth) -> (NaiveDateTime, NaiveDateTime) {
        let days = self.day_range(month.day_count());
        let first = month.first_day();
        let start = first
            .checked_add_days(Days::new(u64::from(days.start() - 1)))
            .unwrap_or(first);
        let end = first
            .checked_add_days(Days::new(u64::from(*days.end())))
            .unwrap_or(NaiveDate::MAX);
        (start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN))
    }

    /// Human readable day span, e.g. `21-28` for the third window of February
    pub fn span_label(self, day_count: u32) -> String {
        let days = self.day_range(day_count);
        format!("{:02}-{:02}", days.start(), days.end())
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Anything carrying an optional timestamp can be partitioned
pub trait Dated {
    fn timestamp(&self) -> Option<NaiveDateTime>;
}

impl Dated for SensorRecord {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }
}

impl<T: Dated> Dated for &T {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        (*self).timestamp()
    }
}

/// Why a record was left out of every window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The timestamp cell could not be parsed
    MalformedTimestamp,
    /// The timestamp lies in another month
    OutsideMonth(NaiveDateTime),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MalformedTimestamp => f.write_str("malformed timestamp"),
            SkipReason::OutsideMonth(ts) => write!(f, "timestamp {ts} outside the reference month"),
        }
    }
}

/// A record excluded from the partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position in the input sequence
    pub index: usize,
    pub reason: SkipReason,
}

/// Records assigned to one window, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<T> {
    pub window: DayWindow,
    pub days: RangeInclusive<u32>,
    pub records: Vec<T>,
}

impl<T> Bucket<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Result of splitting a month of records into day windows
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    pub month: YearMonth,
    pub day_count: u32,
    pub buckets: [Bucket<T>; 3],
    pub skipped: Vec<SkippedRecord>,
}

impl<T> Partition<T> {
    pub fn bucket(&self, window: DayWindow) -> &Bucket<T> {
        &self.buckets[window.index()]
    }

    /// Bucket sizes in window order
    pub fn lengths(&self) -> [usize; 3] {
        [self.buckets[0].len(), self.buckets[1].len(), self.buckets[2].len()]
    }

    /// Number of records placed in some window
    pub fn assigned(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// Skipped records split into (malformed, outside month)
    pub fn skip_counts(&self) -> (usize, usize) {
        let malformed = self
            .skipped
            .iter()
            .filter(|s| s.reason == SkipReason::MalformedTimestamp)
            .count();
        (malformed, self.skipped.len() - malformed)
    }

    /// Log rows per window
    pub fn log_summary(&self) {
        for bucket in &self.buckets {
            info!(
                "Day {}: {} rows",
                bucket.window.span_label(self.day_count),
                bucket.len()
            );
        }
    }
}

/// Partition `records` into the day windows of `reference_date`'s month
pub fn partition<T, I>(records: I, reference_date: NaiveDate) -> Partition<T>
where
    T: Dated,
    I: IntoIterator<Item = T>,
{
    partition_month(records, YearMonth::from_date(reference_date))
}

/// Partition `records` into the day windows of `month`.
///
/// Stable: each bucket keeps the relative input order of its records.
pub fn partition_month<T, I>(records: I, month: YearMonth) -> Partition<T>
where
    T: Dated,
    I: IntoIterator<Item = T>,
{
    let day_count = month.day_count();
    let mut buckets = DayWindow::ALL.map(|window| Bucket {
        window,
        days: window.day_range(day_count),
        records: Vec::new(),
    });
    let mut skipped = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        let Some(timestamp) = record.timestamp() else {
            skipped.push(SkippedRecord {
                index,
                reason: SkipReason::MalformedTimestamp,
            });
            continue;
        };

        let date = timestamp.date();
        if !month.contains(date) {
            skipped.push(SkippedRecord {
                index,
                reason: SkipReason::OutsideMonth(timestamp),
            });
            continue;
        }

        match DayWindow::for_day(date.day()) {
            Some(window) => buckets[window.index()].records.push(record),
            // unreachable for a date inside `month`; keep the record accounted for
            None => skipped.push(SkippedRecord {
                index,
                reason: SkipReason::OutsideMonth(timestamp),
            }),
        }
    }

    debug!(
        "Partitioned {} into {:?} with {} skipped",
        month,
        buckets.each_ref().map(Bucket::len),
        skipped.len()
    );

    Partition {
        month,
        day_count,
        buckets,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beewatch_common::test_utils::mock_datetime;
    use beewatch_common::test_utils::record_fixtures::{malformed_record, one_per_day, record_at};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = DayWindow::ALL.iter().map(|w| w.label()).collect();
        assert_eq!(labels, ["01-10", "11-20", "21-XX"]);
    }

    #[test]
    fn test_third_window_follows_month_length() {
        assert_eq!(DayWindow::Third.day_range(28), 21..=28);
        assert_eq!(DayWindow::Third.day_range(29), 21..=29);
        assert_eq!(DayWindow::Third.day_range(30), 21..=30);
        assert_eq!(DayWindow::Third.day_range(31), 21..=31);
        assert_eq!(DayWindow::Third.span_label(28), "21-28");
    }

    #[test]
    fn test_for_day() {
        assert_eq!(DayWindow::for_day(1), Some(DayWindow::First));
        assert_eq!(DayWindow::for_day(10), Some(DayWindow::First));
        assert_eq!(DayWindow::for_day(11), Some(DayWindow::Second));
        assert_eq!(DayWindow::for_day(20), Some(DayWindow::Second));
        assert_eq!(DayWindow::for_day(21), Some(DayWindow::Third));
        assert_eq!(DayWindow::for_day(0), None);
        assert_eq!(DayWindow::for_day(32), None);
    }

    #[test]
    fn test_bounds() {
        let feb = YearMonth::new(2024, 2).unwrap();
        let (start, end) = DayWindow::Third.bounds(feb);
        assert_eq!(start, mock_datetime(2024, 2, 21, 0, 0));
        assert_eq!(end, mock_datetime(2024, 3, 1, 0, 0));

        let (start, end) = DayWindow::First.bounds(feb);
        assert_eq!(start, mock_datetime(2024, 2, 1, 0, 0));
        assert_eq!(end, mock_datetime(2024, 2, 11, 0, 0));
    }

    #[test]
    fn test_empty_input_gives_three_empty_buckets() {
        let result = partition(Vec::<SensorRecord>::new(), date(2025, 9, 1));
        assert_eq!(result.lengths(), [0, 0, 0]);
        assert!(result.skipped.is_empty());
        assert_eq!(result.day_count, 30);
    }

    #[test]
    fn test_one_record_per_day_september() {
        let records = one_per_day(2025, 9, 30);
        let result = partition(records, date(2025, 9, 15));
        assert_eq!(result.lengths(), [10, 10, 10]);
        assert_eq!(result.bucket(DayWindow::Third).days, 21..=30);
    }

    #[test]
    fn test_leap_february() {
        let result = partition(one_per_day(2024, 2, 29), date(2024, 2, 15));
        assert_eq!(result.day_count, 29);
        assert_eq!(result.bucket(DayWindow::Third).days, 21..=29);
        assert_eq!(result.lengths(), [10, 10, 9]);
    }

    #[test]
    fn test_common_february() {
        let result = partition(one_per_day(2025, 2, 28), date(2025, 2, 15));
        assert_eq!(result.day_count, 28);
        assert_eq!(result.bucket(DayWindow::Third).days, 21..=28);
        assert_eq!(result.lengths(), [10, 10, 8]);
    }

    #[test]
    fn test_thirty_one_day_month() {
        let result = partition(one_per_day(2025, 8, 31), date(2025, 8, 1));
        assert_eq!(result.bucket(DayWindow::Third).days, 21..=31);
        assert_eq!(result.lengths(), [10, 10, 11]);
    }

    #[test]
    fn test_skipped_records_are_reported() {
        let records = vec![
            record_at(mock_datetime(2025, 9, 3, 8, 0), 1, 1),
            malformed_record("yesterday"),
            record_at(mock_datetime(2025, 8, 31, 23, 59), 2, 2),
            record_at(mock_datetime(2025, 9, 30, 23, 59), 3, 3),
            record_at(mock_datetime(2025, 10, 1, 0, 0), 4, 4),
        ];

        let result = partition(records, date(2025, 9, 1));
        assert_eq!(result.lengths(), [1, 0, 1]);
        assert_eq!(result.skipped.len(), 3);
        assert_eq!(
            result.skipped[0],
            SkippedRecord {
                index: 1,
                reason: SkipReason::MalformedTimestamp
            }
        );
        assert_eq!(result.skipped[1].index, 2);
        assert!(matches!(result.skipped[1].reason, SkipReason::OutsideMonth(_)));
        assert_eq!(result.skipped[2].index, 4);
        assert_eq!(result.skip_counts(), (1, 2));
    }

    #[test]
    fn test_partition_is_stable() {
        // out of chronological order on purpose
        let records = vec![
            record_at(mock_datetime(2025, 9, 5, 12, 0), 1, 0),
            record_at(mock_datetime(2025, 9, 2, 12, 0), 2, 0),
            record_at(mock_datetime(2025, 9, 15, 12, 0), 3, 0),
            record_at(mock_datetime(2025, 9, 9, 12, 0), 4, 0),
        ];

        let result = partition(records, date(2025, 9, 1));
        let first: Vec<u32> = result
            .bucket(DayWindow::First)
            .records
            .iter()
            .map(|r| r.in_worker)
            .collect();
        assert_eq!(first, [1, 2, 4]);
    }

    #[test]
    fn test_partition_by_reference() {
        let records = one_per_day(2025, 9, 30);
        let result = partition(records.iter(), date(2025, 9, 1));
        assert_eq!(result.assigned(), 30);
        assert!(std::ptr::eq(result.bucket(DayWindow::First).records[0], &records[0]));
    }
}
