// ── Schedule: Past/Future Splitter ─────────────────────────────────────────
// Partitions a day's fire times against "now". Future times still need a
// one-shot firing today; past times are left to the recurring trigger.
// No trigger registration happens here.

use chrono::NaiveDateTime;

use crate::atoms::types::{SplitTimes, TimePoint};

/// A time is future iff it is strictly later than `now` on the same day.
pub fn split_against_now(times: &[TimePoint], now: TimePoint) -> SplitTimes {
    let (future, past): (Vec<TimePoint>, Vec<TimePoint>) =
        times.iter().copied().partition(|t| t.minute_of_day() > now.minute_of_day());
    SplitTimes { past, future }
}

/// Like [`split_against_now`], but re-anchors every time onto `now`'s
/// calendar date and compares full datetimes, so seconds count.
pub fn split_against_datetime(times: &[TimePoint], now: NaiveDateTime) -> SplitTimes {
    let today = now.date();
    let (future, past): (Vec<TimePoint>, Vec<TimePoint>) =
        times.iter().copied().partition(|t| today.and_time(t.to_naive_time()) > now);
    SplitTimes { past, future }
}
