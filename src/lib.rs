//! Quote rotation core.
//!
//! - [`engine::schedule`] spreads notification times across a daily window and
//!   splits them around "now" for hybrid one-shot/recurring scheduling.
//! - [`engine::quotes`] holds the weighted quote bag and the history cursor
//!   that navigates over what it draws.
//!
//! Everything is synchronous and CPU-only. Stateful pieces are not internally
//! synchronized; [`QuoteEngine`] is the single-owner wrapper.

pub mod atoms;
pub mod engine;

pub use atoms::error::{QuoteError, QuoteResult};
pub use atoms::types::{
    PersonalQuote, QuoteCategory, QuotePool, SamplerStats, SplitTimes, TimePoint, TimeWindow,
    WeightedItem,
};
pub use engine::config::{AppConfig, NotificationSettings, PoolSettings};
pub use engine::quotes::{HistoryCursor, NextItemProducer, Offset, QuoteEngine, WeightedSampler};
pub use engine::schedule::{
    compute_times, plan_notifications, split_against_now, Clock, NotificationPlan, SystemClock,
    TriggerSink,
};
