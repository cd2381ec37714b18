// ── Schedule: Notification Plan ────────────────────────────────────────────
//
// Glue between the pure distributor/splitter and the external trigger sink.
// The clock is injected so "now" is never read globally.
//
// Hybrid strategy handed to the sink:
//   - every fire time gets a daily recurring trigger starting tomorrow
//   - fire times still ahead today additionally get a one-shot for today

use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::atoms::types::{SplitTimes, TimePoint};
use crate::engine::config::NotificationSettings;
use crate::engine::schedule::distributor::compute_times;
use crate::engine::schedule::splitter::split_against_datetime;

/// Source of the current local date and time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Registers OS-level triggers. Implemented outside this crate.
pub trait TriggerSink {
    /// Drop every trigger previously registered by this app.
    fn clear_all(&mut self);
    /// Fire once on `date` at `at`.
    fn schedule_once(&mut self, date: NaiveDate, at: TimePoint);
    /// Fire every day at `at`, first on `starting`.
    fn schedule_daily(&mut self, at: TimePoint, starting: NaiveDate);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPlan {
    pub date: NaiveDate,
    pub times: Vec<TimePoint>,
    pub split: SplitTimes,
}

impl NotificationPlan {
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Replace whatever the sink holds with this plan.
    pub fn dispatch(&self, sink: &mut dyn TriggerSink) {
        sink.clear_all();
        if self.is_empty() {
            return;
        }
        for t in &self.split.future {
            sink.schedule_once(self.date, *t);
        }
        let tomorrow = self.date.checked_add_days(Days::new(1)).unwrap_or(self.date);
        for t in &self.times {
            sink.schedule_daily(*t, tomorrow);
        }
        log::debug!(
            "[schedule] Dispatched {} daily, {} one-shot for {}",
            self.times.len(),
            self.split.future.len(),
            self.date
        );
    }
}

/// Compute today's plan. Disabled notifications give an empty plan.
pub fn plan_notifications(settings: &NotificationSettings, clock: &dyn Clock) -> NotificationPlan {
    let now = clock.now();
    if !settings.enabled {
        return NotificationPlan { date: now.date(), times: Vec::new(), split: SplitTimes::default() };
    }
    let times = compute_times(&settings.window(), settings.count);
    let split = split_against_datetime(&times, now);
    NotificationPlan { date: now.date(), times, split }
}
