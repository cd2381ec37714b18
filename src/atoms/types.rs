// ── Quotewheel Atoms: Pure Data Types ────────────────────────────────────────
// Plain struct/enum definitions plus their trivial constructors and
// conversions. Atoms layer rule: no I/O, no side effects, no imports from
// engine/.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::atoms::constants::{MAX_MINUTE_OF_DAY, MINUTES_PER_DAY};
use crate::atoms::error::{QuoteError, QuoteResult};

// ── Clock times ────────────────────────────────────────────────────────────

/// A wall-clock time of day with minute resolution.
///
/// Field order matters: the derived `Ord` sorts by hour, then minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimePoint {
    pub hour: u8,
    pub minute: u8,
}

impl TimePoint {
    pub fn new(hour: u8, minute: u8) -> QuoteResult<Self> {
        if hour > 23 {
            return Err(QuoteError::invalid_time(
                format!("{hour}:{minute}"),
                "hour must be 0-23",
            ));
        }
        if minute > 59 {
            return Err(QuoteError::invalid_time(
                format!("{hour}:{minute}"),
                "minute must be 0-59",
            ));
        }
        Ok(Self { hour, minute })
    }

    /// Reduce an absolute minute count (possibly past midnight or negative)
    /// to a time of day.
    pub fn from_absolute_minutes(minutes: i32) -> Self {
        let m = minutes.rem_euclid(MINUTES_PER_DAY);
        Self { hour: (m / 60) as u8, minute: (m % 60) as u8 }
    }

    pub fn minute_of_day(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        // Range is guaranteed by construction.
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for TimePoint {
    fn from(t: NaiveTime) -> Self {
        Self { hour: t.hour() as u8, minute: t.minute() as u8 }
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimePoint {
    type Err = QuoteError;

    /// Parse `"H:MM"` or `"HH:MM"`.
    fn from_str(s: &str) -> QuoteResult<Self> {
        let trimmed = s.trim();
        let (h, m) = trimmed
            .split_once(':')
            .ok_or_else(|| QuoteError::invalid_time(s, "expected HH:MM"))?;
        if m.len() != 2 {
            return Err(QuoteError::invalid_time(s, "minutes must have two digits"));
        }
        let hour: u8 = h
            .parse()
            .map_err(|_| QuoteError::invalid_time(s, "hour is not a number"))?;
        let minute: u8 = m
            .parse()
            .map_err(|_| QuoteError::invalid_time(s, "minute is not a number"))?;
        Self::new(hour, minute).map_err(|_| QuoteError::invalid_time(s, "out of range"))
    }
}

impl TryFrom<String> for TimePoint {
    type Error = QuoteError;

    fn try_from(s: String) -> QuoteResult<Self> {
        s.parse()
    }
}

impl From<TimePoint> for String {
    fn from(t: TimePoint) -> Self {
        t.to_string()
    }
}

/// A daily notification window. When `end < start` the window crosses
/// midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    pub start_minute: u16,
    pub end_minute: u16,
}

/// Unchecked wire shape of `TimeWindow`.
#[derive(Deserialize)]
struct RawTimeWindow {
    start_minute: u16,
    end_minute: u16,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = QuoteError;

    fn try_from(raw: RawTimeWindow) -> QuoteResult<Self> {
        Self::try_new(raw.start_minute, raw.end_minute)
    }
}

impl TimeWindow {
    /// Panics if either bound is outside `0..=1439`.
    pub fn new(start_minute: u16, end_minute: u16) -> Self {
        assert!(
            start_minute <= MAX_MINUTE_OF_DAY && end_minute <= MAX_MINUTE_OF_DAY,
            "window bounds must be minutes of day, got {start_minute}..{end_minute}"
        );
        Self { start_minute, end_minute }
    }

    /// Checked variant of [`TimeWindow::new`] for untrusted input.
    pub fn try_new(start_minute: u16, end_minute: u16) -> QuoteResult<Self> {
        if start_minute > MAX_MINUTE_OF_DAY || end_minute > MAX_MINUTE_OF_DAY {
            return Err(QuoteError::invalid_time(
                format!("{start_minute}..{end_minute}"),
                "window bounds must be minutes of day",
            ));
        }
        Ok(Self { start_minute, end_minute })
    }

    pub fn between(start: TimePoint, end: TimePoint) -> Self {
        Self { start_minute: start.minute_of_day(), end_minute: end.minute_of_day() }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end_minute < self.start_minute
    }

    /// End expressed in absolute minutes from the start's midnight.
    pub fn effective_end(&self) -> i32 {
        if self.crosses_midnight() {
            self.end_minute as i32 + MINUTES_PER_DAY
        } else {
            self.end_minute as i32
        }
    }

    pub fn total_span(&self) -> i32 {
        self.effective_end() - self.start_minute as i32
    }
}

/// Past/future partition of a day's fire times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitTimes {
    /// At or before now: only the recurring trigger covers these.
    pub past: Vec<TimePoint>,
    /// Strictly after now: still need a one-shot firing today.
    pub future: Vec<TimePoint>,
}

// ── Quotes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteCategory {
    Builtin,
    Personal,
}

/// One entry of the weighted quote bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedItem {
    pub text: String,
    pub category: QuoteCategory,
    pub base_weight: f64,
    pub current_weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_id: Option<Uuid>,
}

impl WeightedItem {
    /// Panics on a negative or non-finite weight.
    pub fn new(text: impl Into<String>, category: QuoteCategory, base_weight: f64) -> Self {
        assert_weight(base_weight);
        Self {
            text: text.into(),
            category,
            base_weight,
            current_weight: base_weight,
            personal_id: None,
        }
    }

    pub fn builtin(text: impl Into<String>) -> Self {
        Self::new(text, QuoteCategory::Builtin, 1.0)
    }

    pub fn personal(id: Uuid, text: impl Into<String>) -> Self {
        let mut item = Self::new(text, QuoteCategory::Personal, 1.0);
        item.personal_id = Some(id);
        item
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.apply_multiplier(multiplier);
        self
    }

    pub fn apply_multiplier(&mut self, multiplier: f64) {
        assert_weight(multiplier);
        self.current_weight = self.base_weight * multiplier;
    }
}

pub(crate) fn assert_weight(w: f64) {
    assert!(w.is_finite() && w >= 0.0, "weights must be finite and non-negative, got {w}");
}

/// A user-authored quote as supplied by the external pool source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalQuote {
    pub id: Uuid,
    pub text: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// Everything the quote pool source hands over when settings change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePool {
    #[serde(default)]
    pub builtin: Vec<String>,
    #[serde(default)]
    pub personal: Vec<PersonalQuote>,
}

/// Read-only snapshot of sampler bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerStats {
    pub total: usize,
    pub used: usize,
    pub recent: usize,
    pub exhaustion: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let t: TimePoint = "9:05".parse().unwrap();
        assert_eq!(t, TimePoint { hour: 9, minute: 5 });
        assert_eq!(t.to_string(), "09:05");
        assert_eq!("23:59".parse::<TimePoint>().unwrap().minute_of_day(), 1439);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("24:00".parse::<TimePoint>().is_err());
        assert!("12:60".parse::<TimePoint>().is_err());
        assert!("noon".parse::<TimePoint>().is_err());
        assert!("12:5".parse::<TimePoint>().is_err());
    }

    #[test]
    fn test_absolute_minutes_wrap() {
        assert_eq!(TimePoint::from_absolute_minutes(1440 + 15).to_string(), "00:15");
        assert_eq!(TimePoint::from_absolute_minutes(-1).to_string(), "23:59");
    }

    #[test]
    fn test_naive_time_roundtrip() {
        let t = TimePoint::new(18, 45).unwrap();
        assert_eq!(TimePoint::from(t.to_naive_time()), t);
    }

    #[test]
    fn test_window_span() {
        let same_day = TimeWindow::new(540, 600);
        assert!(!same_day.crosses_midnight());
        assert_eq!(same_day.total_span(), 60);

        let overnight = TimeWindow::new(1410, 15);
        assert!(overnight.crosses_midnight());
        assert_eq!(overnight.effective_end(), 1455);
        assert_eq!(overnight.total_span(), 45);
    }

    #[test]
    #[should_panic]
    fn test_window_rejects_out_of_range() {
        TimeWindow::new(0, 1440);
    }

    #[test]
    fn test_window_deserialize_validates_bounds() {
        let ok: TimeWindow =
            serde_json::from_str(r#"{"start_minute":1320,"end_minute":120}"#).unwrap();
        assert_eq!(ok, TimeWindow::new(1320, 120));
        assert!(ok.crosses_midnight());

        let bad = serde_json::from_str::<TimeWindow>(r#"{"start_minute":0,"end_minute":1440}"#);
        assert!(bad.is_err());
        assert!(TimeWindow::try_new(1500, 0).is_err());
    }

    #[test]
    #[should_panic]
    fn test_negative_weight_panics() {
        WeightedItem::new("x", QuoteCategory::Builtin, -1.0);
    }

    #[test]
    fn test_multiplier_keeps_base() {
        let item = WeightedItem::builtin("a").with_multiplier(3.0);
        assert_eq!(item.base_weight, 1.0);
        assert_eq!(item.current_weight, 3.0);
    }

    #[test]
    fn test_time_point_serde_as_string() {
        let t = TimePoint::new(7, 30).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"07:30\"");
        let back: TimePoint = serde_json::from_str("\"07:30\"").unwrap();
        assert_eq!(back, t);
    }
}
