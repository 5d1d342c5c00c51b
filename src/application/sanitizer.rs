// Context sanitizer - final pass settling every pending link in the view model
use crate::application::fault::panic_message;
use crate::application::route_resolver::RouteResolver;
use crate::domain::card::Card;
use crate::domain::dashboard::{Action, Crumb, DashboardViewModel, KpiTile};
use crate::domain::route::{present_href, Link};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Structure-preserving fold that replaces `Link::Pending` with a settled link.
///
/// Implementations recurse through [`ContextSanitizer::sanitize`] so that a
/// fault in one subtree leaves its siblings untouched.
pub trait Sanitize: Clone {
    fn sanitize(&self, sanitizer: &ContextSanitizer) -> Self;
}

#[derive(Clone)]
pub struct ContextSanitizer {
    resolver: Arc<RouteResolver>,
}

impl ContextSanitizer {
    pub fn new(resolver: Arc<RouteResolver>) -> Self {
        Self { resolver }
    }

    /// Sanitize `node`; if that faults, log and return the subtree unchanged.
    pub fn sanitize<T: Sanitize>(&self, node: &T) -> T {
        match panic::catch_unwind(AssertUnwindSafe(|| node.sanitize(self))) {
            Ok(sanitized) => sanitized,
            Err(payload) => {
                tracing::error!(
                    error = %panic_message(payload.as_ref()),
                    "Failed to sanitize view model subtree, passing it through"
                );
                node.clone()
            }
        }
    }

    fn settle(&self, link: &Link) -> Link {
        match link {
            Link::Pending { token, explicit } => present_href(explicit.clone())
                .or_else(|| self.resolver.resolve(token))
                .into(),
            settled => settled.clone(),
        }
    }
}

impl Sanitize for Link {
    fn sanitize(&self, sanitizer: &ContextSanitizer) -> Self {
        sanitizer.settle(self)
    }
}

impl<T: Sanitize> Sanitize for Vec<T> {
    fn sanitize(&self, sanitizer: &ContextSanitizer) -> Self {
        self.iter().map(|node| sanitizer.sanitize(node)).collect()
    }
}

impl<T: Sanitize> Sanitize for Option<T> {
    fn sanitize(&self, sanitizer: &ContextSanitizer) -> Self {
        self.as_ref().map(|node| sanitizer.sanitize(node))
    }
}

impl Sanitize for Card {
    fn sanitize(&self, sanitizer: &ContextSanitizer) -> Self {
        Card {
            href: sanitizer.sanitize(&self.href),
            ..self.clone()
        }
    }
}

impl Sanitize for Crumb {
    fn sanitize(&self, sanitizer: &ContextSanitizer) -> Self {
        Crumb {
            label: self.label.clone(),
            href: sanitizer.sanitize(&self.href),
        }
    }
}

// Actions carry an already resolved href.
impl Sanitize for Action {
    fn sanitize(&self, _sanitizer: &ContextSanitizer) -> Self {
        self.clone()
    }
}

impl Sanitize for KpiTile {
    fn sanitize(&self, _sanitizer: &ContextSanitizer) -> Self {
        self.clone()
    }
}

impl Sanitize for DashboardViewModel {
    fn sanitize(&self, sanitizer: &ContextSanitizer) -> Self {
        DashboardViewModel {
            crumbs: sanitizer.sanitize(&self.crumbs),
            actions: sanitizer.sanitize(&self.actions),
            kpis: sanitizer.sanitize(&self.kpis),
            appointments: sanitizer.sanitize(&self.appointments),
            shifts: sanitizer.sanitize(&self.shifts),
            patients: sanitizer.sanitize(&self.patients),
            reports: sanitizer.sanitize(&self.reports),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::route::RouteToken;
    use crate::infrastructure::route_table::RouteTable;

    fn sanitizer() -> ContextSanitizer {
        let table = RouteTable::new([
            ("home", "/"),
            ("schedules:schedule-dashboard", "/schedules/"),
        ]);
        let resolver = RouteResolver::new(Arc::new(table)).with_namespace_alias("shifts", "schedules");
        ContextSanitizer::new(Arc::new(resolver))
    }

    fn pending(candidates: &[&str]) -> Link {
        Link::Pending {
            token: RouteToken::new(candidates.iter().copied()),
            explicit: None,
        }
    }

    fn view_model() -> DashboardViewModel {
        let mut card = Card::new("Night shift".to_string(), "Shift Night shift".to_string());
        card.href = pending(&["shifts:schedule-dashboard"]);

        DashboardViewModel {
            crumbs: vec![
                Crumb::new("Home", pending(&["home"])),
                Crumb::new("Archive", pending(&["archive:index"])),
                Crumb::new("Dashboard", Link::Disabled),
            ],
            shifts: vec![card],
            ..Default::default()
        }
    }

    #[test]
    fn test_pending_links_are_settled() {
        let sanitized = sanitizer().sanitize(&view_model());

        assert_eq!(sanitized.crumbs[0].href, Link::Resolved("/".to_string()));
        assert_eq!(sanitized.crumbs[1].href, Link::Disabled);
        assert_eq!(sanitized.crumbs[2].href, Link::Disabled);
        assert_eq!(sanitized.shifts[0].href, Link::Resolved("/schedules/".to_string()));
        assert_eq!(sanitized.shifts[0].title, "Night shift");
    }

    #[test]
    fn test_explicit_href_wins_over_resolution() {
        let link = Link::Pending {
            token: RouteToken::new(["home"]),
            explicit: Some("/custom/".to_string()),
        };

        assert_eq!(sanitizer().sanitize(&link), Link::Resolved("/custom/".to_string()));
    }

    #[test]
    fn test_blank_explicit_href_does_not_win() {
        let link = Link::Pending {
            token: RouteToken::new(["home"]),
            explicit: Some(String::new()),
        };
        assert_eq!(sanitizer().sanitize(&link), Link::Resolved("/".to_string()));

        let unroutable = Link::Pending {
            token: RouteToken::new(["archive:index"]),
            explicit: Some("  ".to_string()),
        };
        assert_eq!(sanitizer().sanitize(&unroutable), Link::Disabled);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let sanitizer = sanitizer();
        let once = sanitizer.sanitize(&view_model());
        let twice = sanitizer.sanitize(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_resolved_links_are_untouched() {
        let link = Link::Resolved("/already/there/".to_string());
        assert_eq!(sanitizer().sanitize(&link), link);
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Flaky {
        link: Link,
        explode: bool,
    }

    impl Sanitize for Flaky {
        fn sanitize(&self, sanitizer: &ContextSanitizer) -> Self {
            if self.explode {
                panic!("subtree cannot be walked");
            }
            Flaky {
                link: sanitizer.sanitize(&self.link),
                explode: false,
            }
        }
    }

    #[test]
    fn test_faulting_subtree_passes_through() {
        let nodes = vec![
            Flaky { link: pending(&["home"]), explode: false },
            Flaky { link: pending(&["home"]), explode: true },
            Flaky { link: pending(&["home"]), explode: false },
        ];

        let sanitized = sanitizer().sanitize(&nodes);

        assert_eq!(sanitized[0].link, Link::Resolved("/".to_string()));
        assert_eq!(sanitized[1], nodes[1]);
        assert_eq!(sanitized[2].link, Link::Resolved("/".to_string()));
    }
}
