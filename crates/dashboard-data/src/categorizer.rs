//! App-to-category assignment.
//!
//! Categories are resolved by a linear scan over the mapping in document
//! order; the first category that lists an app claims it.

use std::collections::{HashMap, HashSet};

use dashboard_core::models::{CategoryMap, FALLBACK_CATEGORY};
use tracing::warn;

/// Resolves app identifiers to category display names.
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    map: CategoryMap,
}

impl Categorizer {
    /// Build a categorizer over `map`.
    ///
    /// Apps listed by more than one category are reported once here; at
    /// lookup time the earliest category in the document wins.
    pub fn new(map: CategoryMap) -> Self {
        report_conflicts(&map);
        Self { map }
    }

    /// Display name of the category for `app`, or [`FALLBACK_CATEGORY`].
    pub fn categorize(&self, app: &str) -> &str {
        self.map
            .categories
            .iter()
            .find(|def| def.apps.iter().any(|a| a == app))
            .map(|def| def.name.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }

    /// Category names offered by the category filter.
    ///
    /// Display names in document order without duplicates, followed by the
    /// fallback label so unmapped apps stay selectable.  Every option starts
    /// checked, so unmapped apps are included by default rather than hidden.
    pub fn category_names(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut names: Vec<String> = self
            .map
            .categories
            .iter()
            .filter(|def| seen.insert(def.name.as_str()))
            .map(|def| def.name.clone())
            .collect();
        if !seen.contains(FALLBACK_CATEGORY) {
            names.push(FALLBACK_CATEGORY.to_string());
        }
        names
    }

    pub fn map(&self) -> &CategoryMap {
        &self.map
    }
}

/// Warn about apps claimed by more than one category.
fn report_conflicts(map: &CategoryMap) {
    let mut owner: HashMap<&str, &str> = HashMap::new();
    for def in &map.categories {
        for app in &def.apps {
            match owner.get(app.as_str()) {
                Some(first) if *first != def.name => warn!(
                    "app \"{}\" is listed in both \"{}\" and \"{}\"; using \"{}\"",
                    app, first, def.name, first
                ),
                Some(_) => {}
                None => {
                    owner.insert(app.as_str(), def.name.as_str());
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
