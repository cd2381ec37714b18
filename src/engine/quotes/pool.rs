// engine/quotes/pool.rs — Turns the external quote pool into sampler items.

use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::atoms::constants::FALLBACK_QUOTE;
use crate::atoms::error::QuoteResult;
use crate::atoms::types::{PersonalQuote, QuoteCategory, QuotePool, WeightedItem};
use crate::engine::config::PoolSettings;

impl QuotePool {
    /// Read a pool file: `builtin = [...]` plus `[[personal]]` tables.
    pub fn load(path: impl AsRef<Path>) -> QuoteResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&raw)?)
    }

    /// Active personal quotes, or none if personal quotes are switched off.
    pub fn active_personal<'a>(
        &'a self,
        settings: &PoolSettings,
    ) -> impl Iterator<Item = &'a PersonalQuote> + 'a {
        let include = settings.include_personal;
        self.personal.iter().filter(move |p| include && p.active)
    }
}

/// Sampler items for the current pool and settings.
pub fn build_items(pool: &QuotePool, settings: &PoolSettings) -> Vec<WeightedItem> {
    let builtin = pool
        .builtin
        .iter()
        .map(|text| WeightedItem::new(text.clone(), QuoteCategory::Builtin, settings.builtin_weight));
    let personal = pool
        .active_personal(settings)
        .map(|p| WeightedItem::personal(p.id, p.text.clone()).with_multiplier(settings.personal_frequency));
    builtin.chain(personal).collect()
}

/// Every text the history may fall back to: builtin plus active personal.
pub fn known_texts(pool: &QuotePool, settings: &PoolSettings) -> Vec<String> {
    pool.builtin
        .iter()
        .cloned()
        .chain(pool.active_personal(settings).map(|p| p.text.clone()))
        .collect()
}

/// Quote of the day: day-of-year modulo pool size.
pub fn daily_anchor(texts: &[String], date: NaiveDate) -> String {
    if texts.is_empty() {
        return FALLBACK_QUOTE.to_string();
    }
    let index = date.ordinal() as usize % texts.len();
    texts[index].clone()
}
