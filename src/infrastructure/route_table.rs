// Static route table backing the route registry
use crate::application::route_registry::{RouteError, RouteRegistry};
use crate::infrastructure::config::RouteEntry;
use std::collections::HashMap;

const ARG_PLACEHOLDER: &str = "{arg}";

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, String>,
}

impl RouteTable {
    pub fn new<I, N, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<String>,
    {
        Self {
            routes: entries
                .into_iter()
                .map(|(name, path)| (name.into(), path.into()))
                .collect(),
        }
    }

    pub fn from_config(entries: &[RouteEntry]) -> Self {
        Self::new(entries.iter().map(|e| (e.name.as_str(), e.path.as_str())))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }
}

impl RouteRegistry for RouteTable {
    fn reverse(&self, name: &str, arg: Option<&str>) -> Result<String, RouteError> {
        let pattern = self
            .routes
            .get(name)
            .ok_or_else(|| RouteError::NotRegistered(name.to_string()))?;

        // Patterns without a placeholder ignore a surplus argument
        if !pattern.contains(ARG_PLACEHOLDER) {
            return Ok(pattern.clone());
        }

        let arg = arg.ok_or_else(|| RouteError::MissingArgument(name.to_string()))?;
        Ok(pattern.replace(ARG_PLACEHOLDER, &urlencoding::encode(arg)))
    }
}
