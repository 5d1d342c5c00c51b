// Action builder - dashboard buttons with eagerly resolved links
use crate::application::route_resolver::RouteResolver;
use crate::domain::dashboard::Action;
use crate::domain::route::RouteToken;
use std::sync::Arc;

#[derive(Clone)]
pub struct ActionBuilder {
    resolver: Arc<RouteResolver>,
}

impl ActionBuilder {
    pub fn new(resolver: Arc<RouteResolver>) -> Self {
        Self { resolver }
    }

    /// Resolves the route right away. An action whose href is `None` points
    /// at a feature this deployment lacks and must not be rendered.
    pub fn build(
        &self,
        label: &str,
        icon: Option<&str>,
        route: &RouteToken,
        variant: &str,
        aria_label: Option<&str>,
    ) -> Action {
        Action {
            label: label.to_string(),
            icon: icon.map(str::to_string),
            href: self.resolver.resolve_expected(route),
            variant: variant.to_string(),
            aria_label: aria_label.unwrap_or(label).to_string(),
        }
    }
}
