// ── Quotewheel Atoms: Constants ────────────────────────────────────────────
// All named constants for the crate live here.
// Changing any of these changes observable rotation or scheduling behavior.

// ── Clock arithmetic ──────────────────────────────────────────────────────
pub const MINUTES_PER_DAY: i32 = 1440;
pub const MAX_MINUTE_OF_DAY: u16 = 1439;

// ── Notification distribution ─────────────────────────────────────────────
// Hard cap on notifications per day, applied before the span-based cap.
pub const MAX_NOTIFICATIONS_PER_DAY: i32 = 10;

// ── Weighted quote bag ────────────────────────────────────────────────────
// Most-recent selections excluded from sampling regardless of used status.
pub const RECENCY_CAPACITY: usize = 10;
// Exhaustion at or above this ratio allows a full reset when no candidate
// remains.
pub const RESET_EXHAUSTION: f64 = 0.9;
// Above this ratio every candidate weight is ramped linearly, 1× → 2× at 100%.
pub const BOOST_EXHAUSTION: f64 = 0.6;
pub const BOOST_SLOPE: f64 = 2.0;

// ── History cursor ────────────────────────────────────────────────────────
// Producer draws attempted before falling back to a uniform pick.
pub const PRODUCER_ATTEMPTS: usize = 10;
// Shown when the known pool is empty.
pub const FALLBACK_QUOTE: &str = "Every day is a fresh start.";

// ── Defaults ──────────────────────────────────────────────────────────────
pub const DEFAULT_WINDOW_START: &str = "09:00";
pub const DEFAULT_WINDOW_END: &str = "21:00";
pub const DEFAULT_NOTIFICATION_COUNT: i32 = 3;
