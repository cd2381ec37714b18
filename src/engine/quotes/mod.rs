// Quote rotation: the weighted bag, the history cursor that draws from it,
// pool assembly, and the per-session shared state.

pub mod history;
pub mod pool;
pub mod sampler;
pub mod shared;

pub use history::{HistoryCursor, NextItemProducer, Offset};
pub use pool::{build_items, daily_anchor, known_texts};
pub use sampler::WeightedSampler;
pub use shared::{QuoteEngine, SamplerProducer, SharedSampler};
