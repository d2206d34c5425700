use std::collections::HashMap;

use crate::error::{ConfigError, Result};
use crate::scoring::{DirectorScorer, Scorer, TemplateScorer};

type ScorerFactory = Box<dyn Fn() -> Box<dyn Scorer> + Send + Sync>;

/// Registry for managing available scoring rule sets
///
/// Scorers are registered by name and instantiated on demand.
pub struct ScorerRegistry {
    scorers: HashMap<String, ScorerFactory>,
}

impl ScorerRegistry {
    /// Create a new registry with all built-in scorers
    pub fn new() -> Self {
        let mut registry = Self {
            scorers: HashMap::new(),
        };

        registry.register_builtin_scorers();
        registry
    }

    fn register_builtin_scorers(&mut self) {
        self.register("director", || Box::new(DirectorScorer::new()));
        self.register("template", || Box::new(TemplateScorer::new()));
    }

    /// Register a custom scorer
    ///
    /// # Arguments
    ///
    /// * `name` - Unique name for the scorer
    /// * `factory` - Function that creates new instances of the scorer
    pub fn register<S, F>(&mut self, name: S, factory: F)
    where
        S: Into<String>,
        F: Fn() -> Box<dyn Scorer> + Send + Sync + 'static,
    {
        self.scorers.insert(name.into(), Box::new(factory));
    }

    /// Get a new instance of a scorer by name
    pub fn get_scorer(&self, name: &str) -> Option<Box<dyn Scorer>> {
        self.scorers.get(name).map(|factory| factory())
    }

    /// Like [`get_scorer`](Self::get_scorer), failing with a configuration error
    pub fn resolve(&self, name: &str) -> Result<Box<dyn Scorer>> {
        self.get_scorer(name).ok_or_else(|| {
            ConfigError::UnknownStrategy {
                kind: "scorer".to_string(),
                name: name.to_string(),
            }
            .into()
        })
    }

    /// All registered scorer names, sorted
    pub fn available_scorers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scorers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_scorer(&self, name: &str) -> bool {
        self.scorers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }
}

impl Default for ScorerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
