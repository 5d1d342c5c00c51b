// Ordered secondary strategies for loading shifts
use crate::application::dashboard_repository::ShiftLoader;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct ShiftStrategy {
    pub name: String,
    pub loader: Arc<dyn ShiftLoader>,
}

/// Strategies are tried strictly in order; the first non-empty result wins.
#[derive(Clone, Default)]
pub struct ShiftFallbackChain {
    strategies: Vec<ShiftStrategy>,
}

impl ShiftFallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, name: impl Into<String>, loader: Arc<dyn ShiftLoader>) -> Self {
        self.strategies.push(ShiftStrategy {
            name: name.into(),
            loader,
        });
        self
    }

    /// Build the chain once at startup from the configured order and the
    /// loaders the schedules module actually provides. Names it does not
    /// provide are skipped.
    pub fn from_registered(
        order: &[String],
        mut registered: HashMap<String, Arc<dyn ShiftLoader>>,
    ) -> Self {
        let mut chain = Self::new();
        for name in order {
            match registered.remove(name) {
                Some(loader) => chain = chain.with_strategy(name.clone(), loader),
                None => tracing::debug!(strategy = %name, "Schedules module has no such shift loader"),
            }
        }
        chain
    }

    pub fn strategies(&self) -> &[ShiftStrategy] {
        &self.strategies
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
