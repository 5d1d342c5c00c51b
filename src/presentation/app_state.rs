// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::route_resolver::RouteResolver;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub resolver: Arc<RouteResolver>,
}
