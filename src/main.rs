// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::route_resolver::RouteResolver;
use crate::application::shift_fallback::ShiftFallbackChain;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::fixture_repository::FixtureRepository;
use crate::infrastructure::route_table::RouteTable;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;
    let settings = app_config.dashboard;

    // Route registry (infrastructure layer)
    let route_table = RouteTable::from_config(&app_config.routes);
    tracing::info!(routes = route_table.len(), "Route table ready");

    let resolver = settings
        .namespace_aliases
        .iter()
        .fold(RouteResolver::new(Arc::new(route_table)), |resolver, alias| {
            resolver.with_namespace_alias(alias.alias.clone(), alias.replacement.clone())
        });
    let resolver = Arc::new(resolver);

    // Data providers; a missing fixture file leaves every section empty
    let store = FixtureRepository::load(&app_config.fixtures.path).unwrap_or_else(|error| {
        tracing::warn!("Starting without dashboard fixtures: {:#}", error);
        FixtureRepository::default()
    });
    let store = Arc::new(store.with_display_offset(settings.display_offset()));

    let schedules = ShiftFallbackChain::from_registered(&settings.shift_fallbacks, store.schedule_loaders());
    if schedules.is_empty() {
        tracing::warn!("No shift fallback strategy available");
    }

    // Create services (application layer)
    let dashboard_service =
        DashboardService::new(store, resolver.clone(), settings).with_schedules(schedules);

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        resolver,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", app_config.server.host, app_config.server.port).parse()?;
    tracing::info!(%addr, "Starting medboard service");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(error) => {
            tracing::error!(error = %error, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
