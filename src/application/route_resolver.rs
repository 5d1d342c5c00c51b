// Route resolver - turns symbolic route tokens into concrete links
use crate::application::fault::panic_message;
use crate::application::route_registry::{RouteError, RouteRegistry};
use crate::domain::route::RouteToken;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Clone)]
pub struct RouteResolver {
    registry: Arc<dyn RouteRegistry>,
    /// Deprecated namespace -> namespace that replaced it.
    namespace_aliases: HashMap<String, String>,
}

impl RouteResolver {
    pub fn new(registry: Arc<dyn RouteRegistry>) -> Self {
        Self {
            registry,
            namespace_aliases: HashMap::new(),
        }
    }

    pub fn with_namespace_alias(
        mut self,
        alias: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.namespace_aliases.insert(alias.into(), replacement.into());
        self
    }

    /// Link of the first candidate that resolves, or `None`. Never fails.
    pub fn resolve(&self, token: &RouteToken) -> Option<String> {
        token
            .candidates
            .iter()
            .find_map(|name| self.resolve_candidate(name, token.arg.as_deref()))
    }

    /// Same as [`resolve`](Self::resolve), for tokens that are expected to
    /// resolve in every deployment. A miss is logged as a warning.
    pub fn resolve_expected(&self, token: &RouteToken) -> Option<String> {
        let href = self.resolve(token);
        if href.is_none() {
            tracing::warn!(
                candidates = ?token.candidates,
                arg = ?token.arg,
                "No route candidate could be resolved"
            );
        }
        href
    }

    fn resolve_candidate(&self, name: &str, arg: Option<&str>) -> Option<String> {
        let error = match self.reverse(name, arg) {
            Ok(href) => return Some(href),
            Err(error) => error,
        };
        log_miss(name, &error);

        let fallback = self.substitute_namespace(name)?;
        match self.reverse(&fallback, arg) {
            Ok(href) => Some(href),
            Err(error) => {
                log_miss(&fallback, &error);
                None
            }
        }
    }

    /// Registry lookup with any panic turned into a `Fault`.
    fn reverse(&self, name: &str, arg: Option<&str>) -> Result<String, RouteError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.registry.reverse(name, arg)))
            .unwrap_or_else(|payload| Err(RouteError::Fault(panic_message(payload.as_ref()))))
    }

    fn substitute_namespace(&self, name: &str) -> Option<String> {
        let (namespace, route) = name.split_once(':')?;
        let replacement = self.namespace_aliases.get(namespace)?;
        Some(format!("{}:{}", replacement, route))
    }
}

fn log_miss(name: &str, error: &RouteError) {
    if error.is_not_registered() {
        tracing::debug!(route = name, "Route candidate not registered");
    } else {
        tracing::warn!(route = name, %error, "Route candidate failed to resolve");
    }
}
