// Dashboard service - Use case for composing a doctor's dashboard
use crate::application::action_builder::ActionBuilder;
use crate::application::card_adapters::{CardAdapter, CardAdapters};
use crate::application::dashboard_repository::{DashboardRepository, ProviderError};
use crate::application::fault::panic_message;
use crate::application::route_resolver::RouteResolver;
use crate::application::sanitizer::ContextSanitizer;
use crate::application::shift_fallback::ShiftFallbackChain;
use crate::domain::card::Card;
use crate::domain::dashboard::{Action, Crumb, DashboardViewModel, KpiTile};
use crate::domain::principal::Principal;
use crate::domain::route::{present_href, Link, RouteToken};
use crate::infrastructure::config::DashboardSettings;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn DashboardRepository>,
    schedules: Option<ShiftFallbackChain>,
    adapters: CardAdapters,
    actions: ActionBuilder,
    sanitizer: ContextSanitizer,
    settings: Arc<DashboardSettings>,
}

/// Aborts the section task when the request is abandoned.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl DashboardService {
    pub fn new(
        repository: Arc<dyn DashboardRepository>,
        resolver: Arc<RouteResolver>,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            repository,
            schedules: None,
            adapters: CardAdapters::new(resolver.clone(), settings.display_offset()),
            actions: ActionBuilder::new(resolver.clone()),
            sanitizer: ContextSanitizer::new(resolver),
            settings: Arc::new(settings),
        }
    }

    /// Secondary shift source, consulted only when the primary provider fails.
    pub fn with_schedules(mut self, chain: ShiftFallbackChain) -> Self {
        self.schedules = Some(chain);
        self
    }

    /// Always returns a complete view model; failing sections come back empty.
    pub async fn build(&self, principal: &Principal) -> DashboardViewModel {
        let budget = self.settings.provider_timeout();
        // Primary shift provider plus every fallback strategy, one after another
        let shift_calls = 1 + self.schedules.as_ref().map_or(0, |chain| chain.strategies().len());
        let shift_budget = budget.saturating_mul(u32::try_from(shift_calls).unwrap_or(u32::MAX));

        let (today, on_call, active, appointments, shifts, patients, reports) = tokio::join!(
            self.spawn_section(budget, principal, |service, principal| async move {
                service.call(service.repository.count_todays_appointments(&principal)).await
            }),
            self.spawn_section(budget, principal, |service, principal| async move {
                service.call(service.repository.count_current_oncall(&principal)).await
            }),
            self.spawn_section(budget, principal, |service, principal| async move {
                service.call(service.repository.count_active_patients(&principal)).await
            }),
            self.spawn_section(budget, principal, |service, principal| async move {
                service
                    .fetch_cards("appointments", service.repository.upcoming_appointments(&principal))
                    .await
            }),
            self.spawn_section(shift_budget, principal, |service, principal| async move {
                service.fetch_shifts(&principal).await
            }),
            self.spawn_section(budget, principal, |service, principal| async move {
                service
                    .fetch_cards("patients", service.repository.active_patients(&principal))
                    .await
            }),
            self.spawn_section(budget, principal, |service, principal| async move {
                service
                    .fetch_cards("reports", service.repository.recent_reports(&principal))
                    .await
            }),
        );

        let view_model = DashboardViewModel {
            crumbs: self.crumbs(),
            actions: self.resolve_actions(),
            kpis: kpi_tiles(principal, today, on_call, active),
            appointments: settle("appointments", principal, appointments),
            shifts: settle("shifts", principal, shifts),
            patients: settle("patients", principal, patients),
            reports: settle("reports", principal, reports),
        };

        self.sanitizer.sanitize(&view_model)
    }

    /// Run one section on its own task, so a provider that blocks its thread
    /// cannot hold up the others. The section is given up after `budget`.
    async fn spawn_section<T, F, Fut>(
        &self,
        budget: Duration,
        principal: &Principal,
        fetch: F,
    ) -> Result<T, ProviderError>
    where
        F: FnOnce(DashboardService, Principal) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
        T: Send + 'static,
    {
        let mut task = tokio::spawn(fetch(self.clone(), principal.clone()));
        let _abort = AbortOnDrop(task.abort_handle());

        match tokio::time::timeout(budget, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(error)) if error.is_panic() => {
                Err(ProviderError::Panicked(panic_message(error.into_panic().as_ref())))
            }
            Ok(Err(error)) => Err(ProviderError::Other(error.into())),
            Err(_) => Err(ProviderError::Timeout(budget)),
        }
    }

    /// Run one provider call under the per-call timeout, turning panics into errors.
    async fn call<T, F>(&self, provider: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let timeout = self.settings.provider_timeout();
        match tokio::time::timeout(timeout, AssertUnwindSafe(provider).catch_unwind()).await {
            Err(_) => Err(ProviderError::Timeout(timeout)),
            Ok(Err(payload)) => Err(ProviderError::Panicked(panic_message(payload.as_ref()))),
            Ok(Ok(result)) => result,
        }
    }

    async fn fetch_cards<R, F>(&self, section: &'static str, provider: F) -> Result<Vec<Card>, ProviderError>
    where
        F: Future<Output = Result<Vec<R>, ProviderError>>,
        CardAdapters: CardAdapter<R>,
    {
        tracing::trace!(section, "Fetching dashboard section");
        self.call(async { provider.await.map(|records| self.adapters.adapt_all(&records)) })
            .await
    }

    async fn fetch_shifts(&self, principal: &Principal) -> Result<Vec<Card>, ProviderError> {
        let primary_error = match self.fetch_cards("shifts", self.repository.upcoming_shifts(principal)).await {
            Ok(cards) => return Ok(cards),
            Err(error) => error,
        };
        tracing::debug!(
            principal = %principal,
            error = %primary_error,
            "Primary shift provider failed, trying schedules module"
        );

        let Some(chain) = &self.schedules else {
            tracing::warn!(
                principal = %principal,
                primary_error = %primary_error,
                "Unable to load shifts: schedules module unavailable"
            );
            return Err(primary_error);
        };

        let mut answered = false;
        for strategy in chain.strategies() {
            match self.fetch_cards("shifts", strategy.loader.load(principal)).await {
                Ok(cards) if !cards.is_empty() => {
                    tracing::debug!(strategy = %strategy.name, count = cards.len(), "Loaded shifts from fallback");
                    return Ok(cards);
                }
                Ok(_) => answered = true,
                Err(error) => tracing::debug!(
                    strategy = %strategy.name,
                    principal = %principal,
                    %error,
                    "Shift fallback strategy failed"
                ),
            }
        }

        if !answered {
            tracing::warn!(
                principal = %principal,
                primary_error = %primary_error,
                strategies = chain.strategies().len(),
                "Unable to load shifts from any source"
            );
            return Err(primary_error);
        }
        Ok(Vec::new())
    }

    fn resolve_actions(&self) -> Vec<Action> {
        self.settings
            .actions
            .iter()
            .map(|configured| {
                self.actions.build(
                    &configured.label,
                    configured.icon.as_deref(),
                    &RouteToken::new(configured.routes.iter().map(String::as_str)),
                    &configured.variant,
                    configured.aria_label.as_deref(),
                )
            })
            .filter(|action| {
                if action.href.is_none() {
                    tracing::debug!(label = %action.label, "Omitting dashboard action without a route");
                }
                action.href.is_some()
            })
            .collect()
    }

    /// Crumbs declared with routes stay pending until the sanitizer pass.
    fn crumbs(&self) -> Vec<Crumb> {
        self.settings
            .crumbs
            .iter()
            .map(|crumb| {
                let href: Link = if crumb.routes.is_empty() {
                    crumb.href.clone().into()
                } else {
                    Link::Pending {
                        token: RouteToken::new(crumb.routes.iter().map(String::as_str)),
                        explicit: present_href(crumb.href.clone()),
                    }
                };
                Crumb::new(crumb.label.as_str(), href)
            })
            .collect()
    }
}

fn kpi_tiles(
    principal: &Principal,
    today: Result<i64, ProviderError>,
    on_call: Result<i64, ProviderError>,
    active: Result<i64, ProviderError>,
) -> Vec<KpiTile> {
    vec![
        KpiTile::new(
            "Today Appointments",
            settle("kpis.today_appointments", principal, today.and_then(non_negative)),
            Some("📅"),
        ),
        KpiTile::new(
            "On-Call Now",
            settle("kpis.on_call", principal, on_call.and_then(non_negative)),
            Some("🕒"),
        ),
        KpiTile::new(
            "Active Patients",
            settle("kpis.active_patients", principal, active.and_then(non_negative)),
            Some("🧑‍⚕️"),
        ),
    ]
}

fn non_negative(count: i64) -> Result<i64, ProviderError> {
    if count < 0 {
        return Err(ProviderError::Malformed(format!("negative count {}", count)));
    }
    Ok(count)
}

/// Zero-value substitution for a failed section.
fn settle<T: Default>(section: &'static str, principal: &Principal, result: Result<T, ProviderError>) -> T {
    result.unwrap_or_else(|error| {
        tracing::debug!(
            section,
            principal = %principal,
            %error,
            "Dashboard section failed, rendering it empty"
        );
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_repository::ShiftLoader;
    use crate::domain::principal::Role;
    use crate::domain::records::{Appointment, Patient, Report, Shift};
    use crate::infrastructure::config::{ActionConfig, CrumbConfig, default_routes};
    use crate::infrastructure::route_table::RouteTable;
    use async_trait::async_trait;
    use chrono::NaiveTime;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct StubRepository {
        appointments: Option<Vec<Appointment>>,
        shifts: Option<Vec<Shift>>,
        patients: Option<Vec<Patient>>,
        reports: Option<Vec<Report>>,
        todays_appointments: Option<i64>,
        on_call: Option<i64>,
        panic_on_appointments: bool,
        hang_on_reports: bool,
        block_thread_on_patients: bool,
    }

    fn served<T>(value: &Option<T>, what: &'static str) -> Result<T, ProviderError>
    where
        T: Clone,
    {
        value.clone().ok_or(ProviderError::Unavailable(what))
    }

    #[async_trait]
    impl DashboardRepository for StubRepository {
        async fn upcoming_appointments(&self, _p: &Principal) -> Result<Vec<Appointment>, ProviderError> {
            if self.panic_on_appointments {
                panic!("appointments table vanished");
            }
            served(&self.appointments, "appointments")
        }

        async fn upcoming_shifts(&self, _p: &Principal) -> Result<Vec<Shift>, ProviderError> {
            served(&self.shifts, "shifts")
        }

        async fn active_patients(&self, _p: &Principal) -> Result<Vec<Patient>, ProviderError> {
            if self.block_thread_on_patients {
                std::thread::sleep(Duration::from_millis(1500));
            }
            served(&self.patients, "patients")
        }

        async fn recent_reports(&self, _p: &Principal) -> Result<Vec<Report>, ProviderError> {
            if self.hang_on_reports {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            served(&self.reports, "reports")
        }

        async fn count_todays_appointments(&self, _p: &Principal) -> Result<i64, ProviderError> {
            served(&self.todays_appointments, "today appointments")
        }

        async fn count_current_oncall(&self, _p: &Principal) -> Result<i64, ProviderError> {
            served(&self.on_call, "on-call")
        }
    }

    struct NoProviders;

    impl DashboardRepository for NoProviders {}

    struct CountingLoader {
        result: Option<Vec<Shift>>,
        calls: AtomicUsize,
    }

    impl CountingLoader {
        fn new(result: Option<Vec<Shift>>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ShiftLoader for CountingLoader {
        async fn load(&self, _p: &Principal) -> Result<Vec<Shift>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            served(&self.result, "schedules")
        }
    }

    fn doctor() -> Principal {
        Principal::new(1, "dr.house", Role::Doctor)
    }

    fn resolver() -> Arc<RouteResolver> {
        let table = RouteTable::from_config(&default_routes());
        Arc::new(RouteResolver::new(Arc::new(table)).with_namespace_alias("shifts", "schedules"))
    }

    fn settings() -> DashboardSettings {
        DashboardSettings {
            provider_timeout_ms: 100,
            ..Default::default()
        }
    }

    fn service(repository: impl DashboardRepository + 'static) -> DashboardService {
        DashboardService::new(Arc::new(repository), resolver(), settings())
    }

    fn shift(id: i64, duty: &str) -> Shift {
        Shift {
            id,
            duty_type: Some(duty.to_string()),
            day_of_week: Some(1),
            start_time: NaiveTime::from_hms_opt(8, 0, 0),
            end_time: NaiveTime::from_hms_opt(16, 0, 0),
            is_active: Some(true),
        }
    }

    #[tokio::test]
    async fn test_every_provider_failing_still_yields_full_view_model() {
        let view_model = service(NoProviders).build(&doctor()).await;

        assert!(view_model.appointments.is_empty());
        assert!(view_model.shifts.is_empty());
        assert!(view_model.patients.is_empty());
        assert!(view_model.reports.is_empty());
        assert_eq!(view_model.kpis.len(), 3);
        assert!(view_model.kpis.iter().all(|kpi| kpi.value == 0));
        assert_eq!(view_model.crumbs.len(), 3);
        assert_eq!(view_model.actions.len(), 4);

        let value = serde_json::to_value(&view_model).unwrap();
        for key in ["crumbs", "actions", "kpis", "appointments", "shifts", "patients", "reports"] {
            assert!(value[key].is_array(), "{} missing", key);
        }
    }

    #[tokio::test]
    async fn test_sections_fail_independently() {
        let repository = StubRepository {
            panic_on_appointments: true,
            hang_on_reports: true,
            reports: Some(vec![Report { id: 1, ..Default::default() }]),
            patients: Some(vec![Patient {
                id: 4,
                full_name: Some("Grace Hopper".to_string()),
                ..Default::default()
            }]),
            todays_appointments: Some(5),
            on_call: Some(-2),
            ..Default::default()
        };

        let view_model = service(repository).build(&doctor()).await;

        assert!(view_model.appointments.is_empty());
        assert!(view_model.reports.is_empty());
        assert_eq!(view_model.patients.len(), 1);
        assert_eq!(view_model.patients[0].title, "Grace Hopper");
        let values: Vec<_> = view_model.kpis.iter().map(|kpi| kpi.value).collect();
        assert_eq!(values, vec![5, 0, 0]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_thread_blocking_provider_does_not_stall_siblings() {
        let repository = StubRepository {
            block_thread_on_patients: true,
            patients: Some(vec![Patient { id: 4, ..Default::default() }]),
            reports: Some(vec![Report { id: 1, ..Default::default() }]),
            todays_appointments: Some(2),
            ..Default::default()
        };
        let started = Instant::now();

        let view_model = service(repository).build(&doctor()).await;

        assert!(started.elapsed() < Duration::from_millis(1000));
        assert!(view_model.patients.is_empty());
        assert_eq!(view_model.reports.len(), 1);
        assert_eq!(view_model.kpis[0].value, 2);
    }

    #[tokio::test]
    async fn test_primary_shifts_skip_fallback() {
        let fallback = CountingLoader::new(Some(vec![shift(9, "Fallback")]));
        let repository = StubRepository {
            shifts: Some(Vec::new()),
            ..Default::default()
        };
        let service = service(repository)
            .with_schedules(ShiftFallbackChain::new().with_strategy("get_shifts_for_doctor", fallback.clone()));

        let view_model = service.build(&doctor()).await;

        assert!(view_model.shifts.is_empty());
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shift_fallback_takes_first_non_empty_strategy() {
        let empty_one = CountingLoader::new(Some(Vec::new()));
        let failing = CountingLoader::new(None);
        let winner = CountingLoader::new(Some(vec![shift(3, "Ward round")]));
        let never = CountingLoader::new(Some(vec![shift(4, "Too late")]));

        let mut registered: HashMap<String, Arc<dyn ShiftLoader>> = HashMap::new();
        registered.insert("get_shifts_for_doctor".to_string(), empty_one.clone());
        registered.insert("get_upcoming_shifts".to_string(), failing.clone());
        registered.insert("schedules_dashboard".to_string(), winner.clone());
        registered.insert("late_addition".to_string(), never.clone());

        let order = [
            "get_upcoming_shifts_for_doctor",
            "get_shifts_for_doctor",
            "get_upcoming_shifts",
            "schedules_dashboard",
            "late_addition",
        ]
        .map(str::to_string);
        let chain = ShiftFallbackChain::from_registered(&order, registered);
        let service = service(StubRepository::default()).with_schedules(chain);

        let view_model = service.build(&doctor()).await;

        let expected = service.adapters.adapt(&shift(3, "Ward round"));
        assert_eq!(view_model.shifts, vec![expected]);
        assert_eq!(empty_one.calls.load(Ordering::SeqCst), 1);
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(never.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shifts_empty_when_both_tiers_exhausted() {
        let with_module = service(StubRepository::default())
            .with_schedules(ShiftFallbackChain::new().with_strategy("get_shifts_for_doctor", CountingLoader::new(None)));
        assert!(with_module.build(&doctor()).await.shifts.is_empty());

        let without_module = service(StubRepository::default());
        assert!(without_module.build(&doctor()).await.shifts.is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_actions_are_dropped() {
        let settings = DashboardSettings {
            actions: vec![
                ActionConfig {
                    label: "My Reports".to_string(),
                    icon: None,
                    routes: vec!["reports:dashboard".to_string()],
                    variant: "secondary".to_string(),
                    aria_label: None,
                },
                ActionConfig {
                    label: "Billing".to_string(),
                    icon: None,
                    routes: vec!["billing:index".to_string(), "billing:list".to_string()],
                    variant: "primary".to_string(),
                    aria_label: None,
                },
            ],
            ..settings()
        };
        let service = DashboardService::new(Arc::new(NoProviders), resolver(), settings);

        let view_model = service.build(&doctor()).await;

        assert_eq!(view_model.actions.len(), 1);
        assert_eq!(view_model.actions[0].label, "My Reports");
        assert!(view_model.actions.iter().all(|action| action.href.is_some()));
    }

    #[tokio::test]
    async fn test_routed_crumbs_are_resolved_before_handoff() {
        let settings = DashboardSettings {
            crumbs: vec![
                CrumbConfig {
                    label: "Home".to_string(),
                    href: None,
                    routes: vec!["home".to_string()],
                },
                CrumbConfig {
                    label: "Rota".to_string(),
                    href: None,
                    routes: vec!["shifts:schedule-dashboard".to_string()],
                },
                CrumbConfig {
                    label: "Nowhere".to_string(),
                    href: None,
                    routes: vec!["nowhere:index".to_string()],
                },
            ],
            ..settings()
        };
        let service = DashboardService::new(Arc::new(NoProviders), resolver(), settings);

        let crumbs = service.build(&doctor()).await.crumbs;

        assert_eq!(crumbs[0].href, Link::Resolved("/".to_string()));
        assert_eq!(crumbs[1].href, Link::Resolved("/schedules/".to_string()));
        assert_eq!(crumbs[2].href, Link::Disabled);
        assert!(crumbs.iter().all(|crumb| !matches!(crumb.href, Link::Pending { .. })));
    }

    #[tokio::test]
    async fn test_blank_crumb_href_counts_as_absent() {
        let settings = DashboardSettings {
            crumbs: vec![
                CrumbConfig {
                    label: "Home".to_string(),
                    href: Some(String::new()),
                    routes: vec!["home".to_string()],
                },
                CrumbConfig {
                    label: "Dashboard".to_string(),
                    href: Some("  ".to_string()),
                    routes: Vec::new(),
                },
            ],
            ..settings()
        };
        let service = DashboardService::new(Arc::new(NoProviders), resolver(), settings);

        let crumbs = service.build(&doctor()).await.crumbs;

        assert_eq!(crumbs[0].href, Link::Resolved("/".to_string()));
        assert_eq!(crumbs[1].href, Link::Disabled);
    }
}
