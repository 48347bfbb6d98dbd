// src/plan/queue.rs

use std::collections::HashSet;

/// Recipes left to rebuild, in build order.
///
/// Produced by the planner; yields lazily, skipping excluded recipes as it
/// goes, so a consumer that stops early never touches the rest.
#[derive(Debug, Clone)]
pub struct BuildQueue {
    order: std::vec::IntoIter<String>,
    excluded: HashSet<String>,
}

impl BuildQueue {
    pub fn new(order: Vec<String>, excluded: HashSet<String>) -> Self {
        Self {
            order: order.into_iter(),
            excluded,
        }
    }

    pub fn excluded(&self) -> &HashSet<String> {
        &self.excluded
    }
}

impl Iterator for BuildQueue {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let excluded = &self.excluded;
        self.order.find(|recipe| !excluded.contains(recipe))
    }
}

/// Put `target` last, exactly once.
pub fn target_last(recipes: Vec<String>, target: &str) -> Vec<String> {
    let mut order: Vec<String> = recipes.into_iter().filter(|r| r != target).collect();
    order.push(target.to_string());
    order
}
