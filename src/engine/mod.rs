// ── Quotewheel Engine Layer ──────────────────────────────────────────────────
// Algorithms and stateful components built on the atoms layer.
// No OS notification, widget, or storage APIs are touched here; those sit
// behind the `TriggerSink` and `Clock` traits and the `QuotePool` input.

pub mod config;
pub mod quotes;
pub mod schedule;
