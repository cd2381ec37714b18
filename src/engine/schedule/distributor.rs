// ── Schedule: Time Distributor ─────────────────────────────────────────────
//
// Spreads N fire times across a daily window.
//   - Endpoints are always anchors once the effective count is ≥ 2.
//   - Interior points are evenly spaced, then nudged to the nearest free
//     minute so rounding collisions never produce duplicates.
//   - Windows may cross midnight; output is reduced to clock times and sorted.
//
// Pure and deterministic: same input, same output.

use std::collections::BTreeSet;

use crate::atoms::constants::MAX_NOTIFICATIONS_PER_DAY;
use crate::atoms::types::{TimePoint, TimeWindow};

/// Requested count after clamping to `[1, min(10, span + 1)]`.
pub fn effective_count(window: &TimeWindow, requested: i32) -> i32 {
    let span = window.total_span();
    let upper = MAX_NOTIFICATIONS_PER_DAY.min(span + 1).max(1);
    requested.clamp(1, upper)
}

/// Compute the ascending, duplicate-free list of fire times for `window`.
pub fn compute_times(window: &TimeWindow, requested: i32) -> Vec<TimePoint> {
    let start = window.start_minute as i32;
    let end = window.effective_end();
    let span = window.total_span();

    if span < 1 {
        return vec![TimePoint::from_absolute_minutes(start)];
    }

    let count = effective_count(window, requested);
    let absolute = match count {
        1 => vec![start + span / 2],
        2 => vec![start, end],
        _ => spread_with_anchors(start, end, count),
    };

    let mut times: Vec<TimePoint> =
        absolute.into_iter().map(TimePoint::from_absolute_minutes).collect();
    times.sort();
    times
}

/// Anchors at both ends plus `count - 2` evenly spaced interior points.
fn spread_with_anchors(start: i32, end: i32, count: i32) -> Vec<i32> {
    let mut used = BTreeSet::from([start, end]);
    let step = (end - start) as f64 / (count - 1) as f64;

    for i in 1..=(count - 2) {
        let target = (start as f64 + i as f64 * step).round() as i32;
        match nearest_free_minute(target, start, end, &used) {
            Some(minute) => {
                used.insert(minute);
            }
            None => {
                log::warn!(
                    "[schedule] No free minute for slot {} (target {}) in {}..={}, dropping",
                    i,
                    target,
                    start,
                    end
                );
            }
        }
    }

    used.into_iter().collect()
}

/// Probe forward from `target`; past `end`, probe backward down to `start`.
fn nearest_free_minute(target: i32, start: i32, end: i32, used: &BTreeSet<i32>) -> Option<i32> {
    let mut candidate = target;
    while candidate <= end && used.contains(&candidate) {
        candidate += 1;
    }
    if candidate <= end {
        return Some(candidate);
    }

    candidate = target;
    while candidate >= start && used.contains(&candidate) {
        candidate -= 1;
    }
    (candidate >= start).then_some(candidate)
}
