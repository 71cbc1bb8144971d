use crate::{ItemQuantity, ValueConfig, ValueEntry, WriteOnceCache};
use std::collections::HashMap;

/// Largest single-item contribution to the consumable drop pool.
const POOL_ITEM_CAP: f64 = 100_000.0;
/// Chance that a pool drop happens on any given action.
const POOL_DROP_RATE: f64 = 0.13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Derived {
    ConsumablePool,
}

/// Expected sale value of items, with per-run memo of derived aggregates.
#[derive(Debug, Clone)]
pub struct ValueCatalog {
    entries: HashMap<String, ValueEntry>,
    overrides: HashMap<String, f64>,
    value_of_adventure: f64,
    derived: WriteOnceCache<Derived, f64>,
}

impl ValueCatalog {
    pub fn from_config(config: &ValueConfig) -> Self {
        let entries = config
            .entries
            .iter()
            .map(|entry| (entry.item.clone(), entry.clone()))
            .collect();
        let overrides = config
            .overrides
            .iter()
            .map(|entry| (entry.item.clone(), entry.quantity))
            .collect();
        Self {
            entries,
            overrides,
            value_of_adventure: config.value_of_adventure,
            derived: WriteOnceCache::new(),
        }
    }

    pub fn value(&self, item: &str) -> f64 {
        if let Some(value) = self.overrides.get(item) {
            return *value;
        }
        self.entries.get(item).map(|entry| entry.price).unwrap_or(0.0)
    }

    /// Market price, ignoring overrides.
    pub fn price(&self, item: &str) -> f64 {
        self.entries.get(item).map(|entry| entry.price).unwrap_or(0.0)
    }

    pub fn adventures(&self, item: &str) -> f64 {
        self.entries
            .get(item)
            .and_then(|entry| entry.adventures)
            .unwrap_or(0.0)
    }

    pub fn value_of_adventure(&self) -> f64 {
        self.value_of_adventure
    }

    pub fn average_value<S: AsRef<str>>(&self, items: &[S]) -> f64 {
        if items.is_empty() {
            return 0.0;
        }
        let total: f64 = items.iter().map(|item| self.value(item.as_ref())).sum();
        total / items.len() as f64
    }

    /// Quantity-weighted average of a drop table.
    pub fn weighted_value(&self, drops: &[ItemQuantity]) -> f64 {
        let quantity: f64 = drops.iter().map(|drop| drop.quantity).sum();
        if quantity <= 0.0 {
            return 0.0;
        }
        let total: f64 = drops
            .iter()
            .map(|drop| drop.quantity * self.value(&drop.item))
            .sum();
        total / quantity
    }

    /// Expected per-action value of a random tradeable consumable drop.
    pub fn consumable_pool_value(&mut self) -> f64 {
        let entries = &self.entries;
        let overrides = &self.overrides;
        *self.derived.get_or_insert_with(Derived::ConsumablePool, || {
            let total: f64 = entries
                .values()
                .filter(|entry| entry.tradeable && entry.consumable)
                .map(|entry| {
                    let value = overrides.get(&entry.item).copied().unwrap_or(entry.price);
                    value.clamp(0.0, POOL_ITEM_CAP)
                })
                .sum();
            POOL_DROP_RATE * total
        })
    }

    /// Record a fresh market price. Derived aggregates keep their first value for the run.
    pub fn set_price(&mut self, item: &str, price: f64) {
        match self.entries.get_mut(item) {
            Some(entry) => entry.price = price,
            None => {
                self.entries.insert(
                    item.to_string(),
                    ValueEntry {
                        item: item.to_string(),
                        price,
                        tradeable: true,
                        consumable: false,
                        adventures: None,
                    },
                );
            }
        }
    }

    pub fn reset_derived(&mut self) {
        self.derived.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ValueCatalog {
        ValueCatalog::from_config(&ValueConfig {
            entries: vec![
                ValueEntry {
                    item: "tin magnolia".to_string(),
                    price: 300.0,
                    tradeable: true,
                    consumable: false,
                    adventures: None,
                },
                ValueEntry {
                    item: "perfect negroni".to_string(),
                    price: 20_000.0,
                    tradeable: true,
                    consumable: true,
                    adventures: Some(11.0),
                },
                ValueEntry {
                    item: "fake hand".to_string(),
                    price: 10.0,
                    tradeable: true,
                    consumable: false,
                    adventures: None,
                },
            ],
            overrides: vec![ItemQuantity {
                item: "fake hand".to_string(),
                quantity: 50_000.0,
            }],
            value_of_adventure: 5000.0,
        })
    }

    #[test]
    fn overrides_win_over_prices() {
        let catalog = catalog();
        assert_eq!(catalog.value("fake hand"), 50_000.0);
        assert_eq!(catalog.price("fake hand"), 10.0);
        assert_eq!(catalog.value("unknown"), 0.0);
    }

    #[test]
    fn pool_value_is_memoized_for_the_run() {
        let mut catalog = catalog();
        let first = catalog.consumable_pool_value();
        assert!((first - 0.13 * 20_000.0).abs() < 1e-9);
        catalog.set_price("perfect negroni", 1.0);
        assert_eq!(catalog.consumable_pool_value(), first);
        catalog.reset_derived();
        assert!((catalog.consumable_pool_value() - 0.13).abs() < 1e-9);
    }

    #[test]
    fn weighted_value_averages_by_quantity() {
        let catalog = catalog();
        let drops = vec![
            ItemQuantity {
                item: "tin magnolia".to_string(),
                quantity: 3.0,
            },
            ItemQuantity {
                item: "unknown".to_string(),
                quantity: 1.0,
            },
        ];
        assert!((catalog.weighted_value(&drops) - 225.0).abs() < 1e-9);
        assert_eq!(catalog.weighted_value(&[]), 0.0);
    }
}
