// engine/quotes/shared.rs — Per-session quote state and its locking discipline.
//
// One `QuoteEngine` per app session, passed by reference to whoever needs it.
// The sampler sits behind a RwLock (stats may be read concurrently, every
// draw or rebuild is exclusive). The history cursor sits behind a RwLock too:
// `current` and `stats` run concurrently, anything that can touch the
// lookahead cache takes the write side.
// Lock order when nested: pool → history → sampler. `SamplerProducer` takes
// the sampler lock for one draw while the history write lock is held.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::atoms::types::{QuoteCategory, QuotePool, SamplerStats};
use crate::engine::config::PoolSettings;
use crate::engine::quotes::history::{HistoryCursor, NextItemProducer, Offset};
use crate::engine::quotes::pool::{build_items, daily_anchor, known_texts};
use crate::engine::quotes::sampler::WeightedSampler;

/// Shared handle to one sampler.
pub type SharedSampler = Arc<RwLock<WeightedSampler>>;

/// Feeds the history cursor from a shared sampler.
pub struct SamplerProducer {
    sampler: SharedSampler,
}

impl SamplerProducer {
    pub fn new(sampler: SharedSampler) -> Self {
        Self { sampler }
    }
}

impl NextItemProducer for SamplerProducer {
    fn next_item(&mut self) -> Option<String> {
        self.sampler.write().sample().map(|item| item.text)
    }
}

pub struct QuoteEngine {
    sampler: SharedSampler,
    history: RwLock<HistoryCursor>,
    pool: RwLock<(QuotePool, PoolSettings)>,
}

impl QuoteEngine {
    /// Build the bag and start today's history at the daily anchor.
    pub fn new(pool: QuotePool, settings: PoolSettings, today: NaiveDate) -> Self {
        let sampler: SharedSampler =
            Arc::new(RwLock::new(WeightedSampler::new(build_items(&pool, &settings))));
        let texts = known_texts(&pool, &settings);
        let anchor = daily_anchor(&texts, today);
        let history = HistoryCursor::new(anchor, texts)
            .with_producer(SamplerProducer::new(sampler.clone()));
        log::info!("[quotes] Session started for {} with {} quotes", today, sampler.read().len());
        Self { sampler, history: RwLock::new(history), pool: RwLock::new((pool, settings)) }
    }

    /// Pool or settings changed: rebuild the bag wholesale. History is kept;
    /// its fallback pool is refreshed and any cached lookahead dropped.
    pub fn update_pool(&self, pool: QuotePool, settings: PoolSettings) {
        let texts = known_texts(&pool, &settings);
        self.sampler.write().rebuild(build_items(&pool, &settings));
        self.history.write().set_fallback_pool(texts);
        *self.pool.write() = (pool, settings);
    }

    /// Change the personal frequency without losing rotation progress.
    pub fn set_personal_frequency(&self, multiplier: f64) {
        self.sampler.write().adjust_category_weight(QuoteCategory::Personal, multiplier);
        self.pool.write().1.personal_frequency = multiplier;
    }

    /// Rename a personal quote everywhere it is tracked. `false` if the id is
    /// unknown to the current bag.
    pub fn rename_personal(&self, id: Uuid, new_text: &str) -> bool {
        let renamed = self.sampler.write().rename_by_id(id, new_text);
        let mut guard = self.pool.write();
        let (pool, settings) = &mut *guard;
        if let Some(p) = pool.personal.iter_mut().find(|p| p.id == id) {
            p.text = new_text.to_string();
        }
        self.history.write().set_fallback_pool(known_texts(pool, settings));
        renamed
    }

    pub fn current(&self) -> String {
        self.history.read().current().to_string()
    }

    pub fn preview(&self, offset: Offset) -> Option<String> {
        self.history.write().preview(offset)
    }

    pub fn advance(&self) -> String {
        self.history.write().advance()
    }

    pub fn retreat(&self) -> Option<String> {
        self.history.write().retreat()
    }

    pub fn jump_to(&self, text: &str) -> bool {
        self.history.write().jump_to(text)
    }

    pub fn stats(&self) -> SamplerStats {
        self.sampler.read().stats()
    }

    pub fn sampler(&self) -> SharedSampler {
        self.sampler.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::types::PersonalQuote;

    fn pool(n: usize) -> QuotePool {
        QuotePool { builtin: (0..n).map(|i| format!("b{i}")).collect(), personal: vec![] }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
    }

    #[test]
    fn test_starts_at_daily_anchor() {
        let engine = QuoteEngine::new(pool(5), PoolSettings::default(), today());
        // Feb 10 is ordinal 41; 41 % 5 == 1.
        assert_eq!(engine.current(), "b1");
        assert_eq!(engine.stats().used, 0);
    }

    #[test]
    fn test_advance_draws_from_sampler() {
        let engine = QuoteEngine::new(pool(5), PoolSettings::default(), today());
        let next = engine.advance();
        assert_ne!(next, "b1");
        // A draw that collides with the anchor is retried.
        assert!((1..=2).contains(&engine.stats().used));
        assert_eq!(engine.retreat().as_deref(), Some("b1"));
    }

    #[test]
    fn test_update_pool_resets_bag() {
        let engine = QuoteEngine::new(pool(5), PoolSettings::default(), today());
        engine.advance();
        engine.update_pool(pool(8), PoolSettings::default());
        let stats = engine.stats();
        assert_eq!(stats.total, 8);
        assert_eq!(stats.used, 0);
        assert_eq!(engine.current(), engine.preview(Offset::Current).unwrap());
    }

    #[test]
    fn test_rename_personal() {
        let id = Uuid::new_v4();
        let pool = QuotePool {
            builtin: vec![],
            personal: vec![PersonalQuote { id, text: "draft".into(), active: true }],
        };
        let engine = QuoteEngine::new(pool, PoolSettings::default(), today());
        assert!(engine.rename_personal(id, "final"));
        assert!(!engine.rename_personal(Uuid::new_v4(), "nope"));
        let sampler = engine.sampler();
        assert_eq!(sampler.read().items()[0].text, "final");
    }

    #[test]
    fn test_personal_frequency_adjusts_weights() {
        let id = Uuid::new_v4();
        let pool = QuotePool {
            builtin: vec!["b".into()],
            personal: vec![PersonalQuote { id, text: "p".into(), active: true }],
        };
        let engine = QuoteEngine::new(pool, PoolSettings::default(), today());
        engine.set_personal_frequency(4.0);
        let sampler = engine.sampler();
        let guard = sampler.read();
        assert_eq!(guard.items()[1].current_weight, 4.0);
        assert_eq!(guard.items()[0].current_weight, 1.0);
    }

    fn pool_with_personal(id: Uuid) -> QuotePool {
        QuotePool {
            builtin: vec!["b0".into()],
            personal: vec![PersonalQuote { id, text: "secret".into(), active: true }],
        }
    }

    fn day_two() -> NaiveDate {
        // Ordinal 2 over two quotes anchors on "b0".
        NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()
    }

    #[test]
    fn test_update_pool_drops_removed_lookahead() {
        let id = Uuid::new_v4();
        let engine = QuoteEngine::new(pool_with_personal(id), PoolSettings::default(), day_two());
        assert_eq!(engine.current(), "b0");
        assert_eq!(engine.preview(Offset::Next).as_deref(), Some("secret"));

        let without = QuotePool { builtin: vec!["b0".into(), "b1".into()], personal: vec![] };
        engine.update_pool(without, PoolSettings::default());
        let shown = engine.advance();
        assert_ne!(shown, "secret");
        assert_eq!(shown, "b1");
    }

    #[test]
    fn test_rename_drops_stale_lookahead() {
        let id = Uuid::new_v4();
        let engine = QuoteEngine::new(pool_with_personal(id), PoolSettings::default(), day_two());
        assert_eq!(engine.preview(Offset::Next).as_deref(), Some("secret"));

        assert!(engine.rename_personal(id, "edited"));
        let shown = engine.advance();
        assert_ne!(shown, "secret");
        assert_eq!(shown, "edited");
    }

    #[test]
    fn test_concurrent_reads_share_history_lock() {
        let engine = QuoteEngine::new(pool(5), PoolSettings::default(), today());
        let guard = engine.history.read();
        // A second reader is admitted while the first guard is alive.
        assert_eq!(engine.current(), guard.current());
        assert_eq!(engine.stats().used, 0);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = Arc::new(QuoteEngine::new(pool(30), PoolSettings::default(), today()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let e = engine.clone();
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        e.advance();
                        let _ = e.stats();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        // 20 advances, plus at most one draw that collided with the anchor.
        assert!((20..=21).contains(&engine.stats().used));
    }
}
