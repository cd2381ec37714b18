// ── Quotes: Weighted Sampler ────────────────────────────────────────────────
//
// The "quote bag": weighted sampling without replacement until the pool is
// nearly exhausted.
//
// Key properties:
//   - Used set: a text is not drawn again until the next reset
//   - Recency buffer: the last 10 texts are excluded even if not marked used
//   - Reset only at ≥ 90% exhaustion, then one retry (never recursive)
//   - Late-stage boost above 60% exhaustion, applied per draw only
//   - Identity is the text: two items with equal text share one used slot
//
// Thread-safety: NOT internally synchronized. Callers own it behind a lock
// (see `engine::quotes::shared`).

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::atoms::constants::{BOOST_EXHAUSTION, BOOST_SLOPE, RECENCY_CAPACITY, RESET_EXHAUSTION};
use crate::atoms::types::{assert_weight, QuoteCategory, SamplerStats, WeightedItem};

#[derive(Debug, Clone, Default)]
pub struct WeightedSampler {
    items: Vec<WeightedItem>,
    used: HashSet<String>,
    recent: VecDeque<String>,
}

impl WeightedSampler {
    pub fn new(items: Vec<WeightedItem>) -> Self {
        let mut sampler = Self::default();
        sampler.rebuild(items);
        sampler
    }

    /// Append one item to the pool. Tracking state is kept.
    pub fn add_item(&mut self, item: WeightedItem) {
        assert_weight(item.current_weight);
        self.items.push(item);
    }

    /// Replace the pool wholesale; used and recency tracking start over.
    pub fn rebuild(&mut self, items: Vec<WeightedItem>) {
        for item in &items {
            assert_weight(item.current_weight);
        }
        log::debug!("[sampler] Rebuilt pool with {} items", items.len());
        self.items = items;
        self.used.clear();
        self.recent.clear();
    }

    /// Set `current_weight = base_weight * multiplier` for one category.
    pub fn adjust_category_weight(&mut self, category: QuoteCategory, multiplier: f64) {
        assert_weight(multiplier);
        for item in self.items.iter_mut().filter(|i| i.category == category) {
            item.apply_multiplier(multiplier);
        }
    }

    /// Rename a personal item in place, carrying its used/recent membership
    /// over to the new text. Returns `false` if no item has `id`.
    pub fn rename_by_id(&mut self, id: Uuid, new_text: impl Into<String>) -> bool {
        let new_text = new_text.into();
        let Some(item) = self.items.iter_mut().find(|i| i.personal_id == Some(id)) else {
            return false;
        };
        let old_text = std::mem::replace(&mut item.text, new_text.clone());

        if self.used.remove(&old_text) {
            self.used.insert(new_text.clone());
        }
        for entry in self.recent.iter_mut().filter(|t| **t == old_text) {
            *entry = new_text.clone();
        }
        log::debug!("[sampler] Renamed personal quote {}", id);
        true
    }

    /// Draw one item using the thread-local RNG.
    pub fn sample(&mut self) -> Option<WeightedItem> {
        self.sample_with(&mut rand::rng())
    }

    /// Draw one item using `rng`.
    pub fn sample_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<WeightedItem> {
        let mut candidates = self.candidate_indices();

        if candidates.is_empty() {
            if self.items.is_empty() {
                return None;
            }
            let exhaustion = self.exhaustion_ratio();
            if exhaustion < RESET_EXHAUSTION {
                log::debug!(
                    "[sampler] No candidates at {:.0}% exhaustion, not resetting",
                    exhaustion * 100.0
                );
                return None;
            }
            self.reset(rng);
            candidates = self.candidate_indices();
            if candidates.is_empty() {
                return None;
            }
        }

        let boost = boost_factor(self.exhaustion_ratio());
        let weights: Vec<f64> =
            candidates.iter().map(|&i| self.items[i].current_weight * boost).collect();
        let pick = weighted_pick(&weights, rng);
        let index = candidates[pick];

        let selected = self.items[index].clone();
        self.mark_used(&selected.text);
        Some(selected)
    }

    /// Fraction of the pool marked used; 0 for an empty pool.
    pub fn exhaustion_ratio(&self) -> f64 {
        if self.items.is_empty() {
            0.0
        } else {
            self.used.len() as f64 / self.items.len() as f64
        }
    }

    pub fn stats(&self) -> SamplerStats {
        SamplerStats {
            total: self.items.len(),
            used: self.used.len(),
            recent: self.recent.len(),
            exhaustion: self.exhaustion_ratio(),
        }
    }

    pub fn items(&self) -> &[WeightedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_used(&self, text: &str) -> bool {
        self.used.contains(text)
    }

    /// Recently drawn texts, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }

    fn candidate_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !self.used.contains(&item.text) && !self.recent.contains(&item.text))
            .map(|(i, _)| i)
            .collect()
    }

    fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        log::debug!(
            "[sampler] Resetting at {:.0}% exhaustion ({} items)",
            self.exhaustion_ratio() * 100.0,
            self.items.len()
        );
        self.used.clear();
        self.recent.clear();
        self.items.shuffle(rng);
    }

    fn mark_used(&mut self, text: &str) {
        self.used.insert(text.to_string());
        self.recent.push_back(text.to_string());
        while self.recent.len() > RECENCY_CAPACITY {
            self.recent.pop_front();
        }
    }
}

/// 1× up to 60% exhaustion, ramping linearly to 2× at 100%.
fn boost_factor(exhaustion: f64) -> f64 {
    if exhaustion > BOOST_EXHAUSTION {
        1.0 + (exhaustion - BOOST_EXHAUSTION) * BOOST_SLOPE
    } else {
        1.0
    }
}

/// Index into `weights` chosen proportionally; uniform when the total is not
/// positive. `weights` must be non-empty.
fn weighted_pick<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.random_range(0..weights.len());
    }

    let r = rng.random_range(0.0..total);
    let mut running = 0.0;
    for (i, w) in weights.iter().enumerate() {
        running += w;
        if running > r {
            return i;
        }
    }
    // Float accumulation can land exactly on `total`.
    weights.len() - 1
}
