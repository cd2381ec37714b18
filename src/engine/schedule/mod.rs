// Notification scheduling: time distribution, past/future split, and the
// plan handed to the external trigger sink.

pub mod distributor;
pub mod plan;
pub mod splitter;

pub use distributor::{compute_times, effective_count};
pub use plan::{plan_notifications, Clock, FixedClock, NotificationPlan, SystemClock, TriggerSink};
pub use splitter::{split_against_datetime, split_against_now};
