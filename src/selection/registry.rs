use std::collections::HashMap;

use crate::error::{ConfigError, Result};
use crate::selection::{GreedySelector, Selector, ThresholdSelector};

type SelectorFactory = Box<dyn Fn() -> Box<dyn Selector> + Send + Sync>;

/// Registry for managing available selection strategies
pub struct SelectorRegistry {
    selectors: HashMap<String, SelectorFactory>,
}

impl SelectorRegistry {
    /// Create a new registry with all built-in selectors
    pub fn new() -> Self {
        let mut registry = Self {
            selectors: HashMap::new(),
        };

        registry.register("greedy", || Box::new(GreedySelector::new()));
        registry.register("threshold", || Box::new(ThresholdSelector::new()));
        registry
    }

    /// Register a custom selector under `name`, replacing any existing one
    pub fn register<S, F>(&mut self, name: S, factory: F)
    where
        S: Into<String>,
        F: Fn() -> Box<dyn Selector> + Send + Sync + 'static,
    {
        self.selectors.insert(name.into(), Box::new(factory));
    }

    pub fn get_selector(&self, name: &str) -> Option<Box<dyn Selector>> {
        self.selectors.get(name).map(|factory| factory())
    }

    pub fn resolve(&self, name: &str) -> Result<Box<dyn Selector>> {
        self.get_selector(name).ok_or_else(|| {
            ConfigError::UnknownStrategy {
                kind: "selector".to_string(),
                name: name.to_string(),
            }
            .into()
        })
    }

    /// All registered selector names, sorted
    pub fn available_selectors(&self) -> Vec<String> {
        let mut names: Vec<String> = self.selectors.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_selector(&self, name: &str) -> bool {
        self.selectors.contains_key(name)
    }
}

impl Default for SelectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
