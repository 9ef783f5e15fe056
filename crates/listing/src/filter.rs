//! Key/value filter state.
//!
//! The controller only stores values and reports changes; debouncing belongs
//! to whoever reacts to the change (see `ListOrchestrator::set_filter_debounced`).
use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::value::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterBag(BTreeMap<String, Value>);

impl FilterBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries carrying a non-blank value.
    pub fn active_count(&self) -> usize {
        self.0.values().filter(|value| !value.is_blank()).count()
    }

    /// Copy of the bag without blank entries; this is what gets sent to a
    /// data source.
    pub fn active(&self) -> FilterBag {
        FilterBag(
            self.0
                .iter()
                .filter(|(_, value)| !value.is_blank())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Value)> for FilterBag {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

type FilterListener = Box<dyn FnMut(&FilterBag) + Send>;

#[derive(Default)]
pub struct FilterController {
    bag: FilterBag,
    on_change: Option<FilterListener>,
}

impl fmt::Debug for FilterController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterController")
            .field("bag", &self.bag)
            .finish_non_exhaustive()
    }
}

impl FilterController {
    pub fn new(initial: FilterBag) -> Self {
        Self {
            bag: initial,
            on_change: None,
        }
    }

    /// Registers a listener called with the whole bag after every mutation.
    #[must_use]
    pub fn with_on_change(mut self, listener: impl FnMut(&FilterBag) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn bag(&self) -> &FilterBag {
        &self.bag
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.bag.get(key)
    }

    pub fn active_filter_count(&self) -> usize {
        self.bag.active_count()
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.bag.0.insert(key.into(), value.into());
        self.notify();
    }

    pub fn remove_filter(&mut self, key: &str) {
        self.bag.0.remove(key);
        self.notify();
    }

    pub fn clear_filters(&mut self) {
        self.bag.0.clear();
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.bag);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn blank_values_do_not_count_as_active() {
        let mut filters = FilterController::default();

        filters.set_filter("search", "");
        filters.set_filter("status", "active");
        filters.set_filter("role", None::<String>);

        assert_eq!(filters.active_filter_count(), 1);
        let active = filters.bag().active();
        assert_eq!(active.get("status"), Some(&Value::from("active")));
        assert_eq!(active.get("search"), None);
        assert_eq!(active.get("role"), None);
    }

    #[test]
    fn remove_and_clear() {
        let mut filters = FilterController::default();
        filters.set_filter("status", "active");
        filters.set_filter("min_balance", 100);

        filters.remove_filter("status");
        assert_eq!(filters.active_filter_count(), 1);
        assert_eq!(filters.get("status"), None);

        filters.clear_filters();
        assert!(filters.bag().is_empty());
    }

    #[test]
    fn listener_receives_the_full_bag() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut filters = FilterController::default()
            .with_on_change(move |bag| sink.lock().unwrap().push(bag.active_count()));

        filters.set_filter("status", "active");
        filters.set_filter("search", "bob");
        filters.remove_filter("search");
        filters.clear_filters();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1, 0]);
    }

    #[test]
    fn active_payload_serializes_as_plain_object() {
        let mut filters = FilterController::default();
        filters.set_filter("status", vec!["active", "pending"]);
        filters.set_filter("search", "");

        let json = serde_json::to_string(&filters.bag().active()).unwrap();
        assert_eq!(json, r#"{"status":["active","pending"]}"#);
    }
}
