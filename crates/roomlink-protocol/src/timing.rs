//! Entry timing flags.
//!
//! When a client enters a room, the backend wants to know how novel the
//! entry is along two independent axes: did it cross a local calendar
//! boundary, and has a full day or month of wall-clock time elapsed since
//! the previous entry. A caller may care that the calendar day changed
//! without a full day having elapsed, so all four flags are always reported.

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};

/// Milliseconds in a day.
const MS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

/// Milliseconds in a fixed 30-day month window. Deliberately not
/// calendar-aware; the calendar notion is `is_new_monthly`.
const MS_PER_MONTH: i64 = MS_PER_DAY * 30;

/// Timing novelty flags sent with every entry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTimingFlags {
    /// The local calendar day differs from the last entry's.
    pub is_new_daily: bool,
    /// The local calendar month differs from the last entry's.
    pub is_new_monthly: bool,
    /// Strictly more than 24 hours have elapsed since the last entry.
    pub is_new_day_window: bool,
    /// Strictly more than 30 days have elapsed since the last entry.
    pub is_new_month_window: bool,
}

impl EntryTimingFlags {
    /// All four flags set; the shape of a first-ever entry.
    #[must_use]
    pub const fn first_entry() -> Self {
        Self {
            is_new_daily: true,
            is_new_monthly: true,
            is_new_day_window: true,
            is_new_month_window: true,
        }
    }

    /// Compute flags from the previous entry time, or [`first_entry`] when
    /// there is none.
    ///
    /// Calendar comparisons happen in the zone of the supplied timestamps,
    /// so pass both in the client's local zone. Window comparisons are
    /// strict: an entry exactly 24 hours after the last one is not a new
    /// day window.
    ///
    /// [`first_entry`]: Self::first_entry
    #[must_use]
    pub fn compute<Tz: TimeZone>(last_entered_at: Option<&DateTime<Tz>>, now: &DateTime<Tz>) -> Self {
        let Some(last) = last_entered_at else {
            return Self::first_entry();
        };

        let elapsed_ms = now
            .clone()
            .signed_duration_since(last.clone())
            .num_milliseconds();

        Self {
            is_new_daily: !same_day(last, now),
            is_new_monthly: !same_month(last, now),
            is_new_day_window: elapsed_ms > MS_PER_DAY,
            is_new_month_window: elapsed_ms > MS_PER_MONTH,
        }
    }
}

fn same_month<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

fn same_day<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    same_month(a, b) && a.day() == b.day()
}
