// ── Quotes: History Cursor ──────────────────────────────────────────────────
//
// Bidirectional navigation over displayed quotes for one day.
//
//   sequence: [anchor, q1, q2, ... frontier]     append-only, never empty
//   cursor:   index of the quote on screen
//   lookahead: value `advance()` would append from the frontier, computed by
//              `preview(Next)` so the "next" card can be shown ahead of time
//
// New values come from a `NextItemProducer` (normally the weighted sampler).
// When the producer is missing or keeps returning the current quote, a
// uniform pick from the known pool is used instead.
//
// Thread-safety: NOT internally synchronized.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::atoms::constants::{FALLBACK_QUOTE, PRODUCER_ATTEMPTS};

/// Supplies fresh quote texts when the history extends past its frontier.
pub trait NextItemProducer: Send + Sync {
    /// `None` means the producer has nothing to offer right now.
    fn next_item(&mut self) -> Option<String>;
}

impl<F> NextItemProducer for F
where
    F: FnMut() -> Option<String> + Send + Sync,
{
    fn next_item(&mut self) -> Option<String> {
        self()
    }
}

/// Which neighbor of the cursor to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Previous,
    Current,
    Next,
}

pub struct HistoryCursor {
    sequence: Vec<String>,
    cursor: usize,
    lookahead: Option<String>,
    producer: Option<Box<dyn NextItemProducer>>,
    /// Uniform fallback pool: builtin plus active personal texts.
    fallback_pool: Vec<String>,
    rng: StdRng,
}

impl std::fmt::Debug for HistoryCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryCursor")
            .field("sequence", &self.sequence)
            .field("cursor", &self.cursor)
            .field("lookahead", &self.lookahead)
            .field("has_producer", &self.producer.is_some())
            .field("fallback_pool", &self.fallback_pool.len())
            .finish()
    }
}

impl HistoryCursor {
    /// Start a new day's history at `anchor`.
    pub fn new(anchor: impl Into<String>, fallback_pool: Vec<String>) -> Self {
        Self {
            sequence: vec![anchor.into()],
            cursor: 0,
            lookahead: None,
            producer: None,
            fallback_pool,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_producer(mut self, producer: impl NextItemProducer + 'static) -> Self {
        self.producer = Some(Box::new(producer));
        self
    }

    /// Seed the fallback RNG, for reproducible picks.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn set_producer(&mut self, producer: Option<Box<dyn NextItemProducer>>) {
        self.producer = producer;
        self.lookahead = None;
    }

    /// Replace the fallback pool. Any cached lookahead may name a quote that
    /// is no longer in the pool, so it is dropped.
    pub fn set_fallback_pool(&mut self, pool: Vec<String>) {
        self.fallback_pool = pool;
        self.invalidate_lookahead();
    }

    /// Forget the cached `preview(Next)` value; the next frontier step asks
    /// the producer again.
    pub fn invalidate_lookahead(&mut self) {
        if self.lookahead.take().is_some() {
            log::debug!("[history] Dropped cached lookahead");
        }
    }

    pub fn current(&self) -> &str {
        debug_assert!(self.cursor < self.sequence.len());
        &self.sequence[self.cursor]
    }

    /// Look at a neighbor without moving. `Next` at the frontier computes and
    /// caches a candidate; calling it again returns the same value.
    pub fn preview(&mut self, offset: Offset) -> Option<String> {
        match offset {
            Offset::Previous => self
                .cursor
                .checked_sub(1)
                .map(|i| self.sequence[i].clone()),
            Offset::Current => Some(self.current().to_string()),
            Offset::Next => {
                if let Some(next) = self.sequence.get(self.cursor + 1) {
                    return Some(next.clone());
                }
                if self.lookahead.is_none() {
                    self.lookahead = Some(self.produce_next());
                }
                self.lookahead.clone()
            }
        }
    }

    /// Move forward one step, extending the history at the frontier.
    pub fn advance(&mut self) -> String {
        if self.cursor + 1 < self.sequence.len() {
            self.cursor += 1;
            return self.sequence[self.cursor].clone();
        }
        let next = match self.lookahead.take() {
            Some(cached) => cached,
            None => self.produce_next(),
        };
        self.sequence.push(next.clone());
        self.cursor += 1;
        next
    }

    /// Move back one step. `None` when already at the first entry.
    pub fn retreat(&mut self) -> Option<String> {
        self.lookahead = None;
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.sequence[self.cursor].clone())
    }

    /// Show `text` (e.g. from a deep link). Returns `true` if it was already in
    /// the history, `false` if it was appended as the new frontier.
    pub fn jump_to(&mut self, text: &str) -> bool {
        self.lookahead = None;
        if let Some(index) = self.sequence.iter().rposition(|t| t == text) {
            self.cursor = index;
            log::debug!("[history] Jumped back to entry {}", index);
            return true;
        }
        self.sequence.push(text.to_string());
        self.cursor = self.sequence.len() - 1;
        log::debug!("[history] Inserted jump target at {}", self.cursor);
        false
    }

    /// Never zero: the anchor is always present.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    pub fn is_at_frontier(&self) -> bool {
        self.cursor + 1 == self.sequence.len()
    }

    fn produce_next(&mut self) -> String {
        let current = self.current().to_string();

        if let Some(producer) = self.producer.as_mut() {
            for _ in 0..PRODUCER_ATTEMPTS {
                match producer.next_item() {
                    Some(text) if text != current => return text,
                    Some(_) => continue,
                    None => break,
                }
            }
            log::debug!("[history] Producer gave no fresh quote, using fallback pool");
        }

        let others: Vec<&String> = self.fallback_pool.iter().filter(|t| **t != current).collect();
        if let Some(pick) = others.choose(&mut self.rng) {
            return (*pick).clone();
        }
        match self.fallback_pool.choose(&mut self.rng) {
            Some(pick) => pick.clone(),
            None => FALLBACK_QUOTE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_producer() -> (impl NextItemProducer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let producer = move || {
            let n = c.fetch_add(1, Ordering::SeqCst);
            Some(format!("q{n}"))
        };
        (producer, calls)
    }

    fn pool(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_starts_at_anchor() {
        let mut h = HistoryCursor::new("anchor", vec![]);
        assert_eq!(h.current(), "anchor");
        assert_eq!(h.len(), 1);
        assert_eq!(h.preview(Offset::Previous), None);
        assert_eq!(h.retreat(), None);
    }

    #[test]
    fn test_advance_then_retreat_restores_current() {
        let (producer, _) = counting_producer();
        let mut h = HistoryCursor::new("anchor", vec![]).with_producer(producer);
        assert_eq!(h.advance(), "q0");
        assert_eq!(h.retreat().as_deref(), Some("anchor"));
        assert_eq!(h.current(), "anchor");
    }

    #[test]
    fn test_preview_next_is_cached_and_committed() {
        let (producer, calls) = counting_producer();
        let mut h = HistoryCursor::new("anchor", vec![]).with_producer(producer);

        let first = h.preview(Offset::Next).unwrap();
        let second = h.preview(Offset::Next).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.len(), 1);

        assert_eq!(h.advance(), first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_retreat_invalidates_lookahead() {
        let (producer, calls) = counting_producer();
        let mut h = HistoryCursor::new("anchor", vec![]).with_producer(producer);
        h.advance();
        h.preview(Offset::Next);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        h.retreat();
        // Existing entry ahead: no producer call.
        assert_eq!(h.preview(Offset::Next).as_deref(), Some("q0"));
        assert_eq!(h.advance(), "q0");
        // Back at the frontier the old lookahead is gone.
        assert_eq!(h.preview(Offset::Next).as_deref(), Some("q2"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_advance_walks_existing_entries() {
        let (producer, _) = counting_producer();
        let mut h = HistoryCursor::new("anchor", vec![]).with_producer(producer);
        h.advance();
        h.advance();
        h.retreat();
        h.retreat();
        assert_eq!(h.advance(), "q0");
        assert_eq!(h.advance(), "q1");
        assert_eq!(h.len(), 3);
        assert!(h.is_at_frontier());
    }

    #[test]
    fn test_jump_to_existing_does_not_grow() {
        let (producer, _) = counting_producer();
        let mut h = HistoryCursor::new("anchor", vec![]).with_producer(producer);
        h.advance();
        h.advance();
        assert!(h.jump_to("anchor"));
        assert_eq!(h.len(), 3);
        assert_eq!(h.position(), 0);
    }

    #[test]
    fn test_jump_to_new_appends() {
        let mut h = HistoryCursor::new("anchor", vec![]);
        assert!(!h.jump_to("deep link"));
        assert_eq!(h.current(), "deep link");
        assert_eq!(h.len(), 2);
        assert!(h.is_at_frontier());
    }

    #[test]
    fn test_jump_to_invalidates_lookahead() {
        let (producer, calls) = counting_producer();
        let mut h = HistoryCursor::new("anchor", vec![]).with_producer(producer);
        h.preview(Offset::Next);
        h.jump_to("linked");
        assert_eq!(h.advance(), "q1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fallback_pool_change_invalidates_lookahead() {
        let (producer, calls) = counting_producer();
        let mut h = HistoryCursor::new("anchor", vec![]).with_producer(producer);
        assert_eq!(h.preview(Offset::Next).as_deref(), Some("q0"));
        h.set_fallback_pool(pool(&["x"]));
        assert_eq!(h.advance(), "q1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalidate_lookahead_keeps_history() {
        let (producer, _) = counting_producer();
        let mut h = HistoryCursor::new("anchor", vec![]).with_producer(producer);
        h.advance();
        h.preview(Offset::Next);
        h.invalidate_lookahead();
        assert_eq!(h.sequence(), ["anchor".to_string(), "q0".to_string()]);
        assert_eq!(h.preview(Offset::Next).as_deref(), Some("q2"));
    }

    #[test]
    fn test_producer_colliding_uses_fallback() {
        let mut h = HistoryCursor::new("same", pool(&["same", "other"]))
            .with_producer(|| Some("same".to_string()))
            .with_seed(1);
        assert_eq!(h.advance(), "other");
    }

    #[test]
    fn test_producer_missing_uses_fallback() {
        let mut h = HistoryCursor::new("a", pool(&["a", "b", "c"])).with_seed(3);
        for _ in 0..20 {
            let before = h.current().to_string();
            let next = h.advance();
            assert_ne!(next, before);
        }
    }

    #[test]
    fn test_producer_returning_none_uses_fallback() {
        let mut h = HistoryCursor::new("a", pool(&["b"])).with_producer(|| None::<String>);
        assert_eq!(h.advance(), "b");
    }

    #[test]
    fn test_single_item_pool_repeats_current() {
        let mut h = HistoryCursor::new("only", pool(&["only"]));
        assert_eq!(h.advance(), "only");
    }

    #[test]
    fn test_empty_pool_gives_sentinel() {
        let mut h = HistoryCursor::new("a", vec![]);
        assert_eq!(h.advance(), FALLBACK_QUOTE);
    }

    #[test]
    fn test_producer_retries_before_fallback() {
        let mut answers = vec!["cur".to_string(), "cur".to_string(), "fresh".to_string()].into_iter();
        let mut h = HistoryCursor::new("cur", vec![]).with_producer(move || answers.next());
        assert_eq!(h.advance(), "fresh");
    }
}
