use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key of the free-text search filter.
pub const SEARCH_KEY: &str = "q";

/// Client-owned list filters. Empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    /// Set `key` to `value`, removing it when the trimmed value is empty.
    /// Returns whether the filter set changed.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return self.remove(key);
        }
        match self.0.get(key) {
            Some(current) if current == value => false,
            _ => {
                self.0.insert(key.to_string(), value.to_string());
                true
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn search(&self) -> Option<&str> {
        self.get(SEARCH_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::default();
        for (k, v) in iter {
            let (k, v): (String, String) = (k.into(), v.into());
            filters.set(&k, &v);
        }
        filters
    }
}

/// Everything a list request needs: page cursor, page size and filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub filters: Filters,
}

impl ListQuery {
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            filters: Filters::default(),
        }
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Query pairs in a stable order: `page`, `per_page`, then filters by key.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];
        params.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }

    /// Filter-only pairs, used to keep filters on pagination links.
    pub fn filter_params(&self) -> Vec<(String, String)> {
        self.filters.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}
