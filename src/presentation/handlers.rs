// HTTP request handlers
use crate::domain::route::RouteToken;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::principal::principal_from_headers;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

const LOGIN_ROUTE: &str = "accounts:login";

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Doctor dashboard view model. Anyone who is not a signed-in doctor is sent
/// to the login page.
pub async fn doctor_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let principal = match principal_from_headers(&headers) {
        Ok(principal) if principal.is_doctor() => principal,
        Ok(principal) => {
            tracing::info!(principal = %principal, "Refusing doctor dashboard to non-doctor");
            return login_redirect(&state, ApiError::Forbidden);
        }
        Err(error) => return login_redirect(&state, error),
    };

    let view_model = state.dashboard_service.build(&principal).await;
    Ok(Json(view_model).into_response())
}

/// Send the principal to the landing dashboard of their role.
pub async fn role_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Redirect, ApiError> {
    let principal = principal_from_headers(&headers)?;
    let route = principal.role.dashboard_route();

    state
        .resolver
        .resolve_expected(&RouteToken::new([route]))
        .map(|href| Redirect::to(&href))
        .ok_or_else(|| ApiError::NotFound(format!("no dashboard route '{}'", route)))
}

fn login_redirect(state: &AppState, unresolved: ApiError) -> Result<Response, ApiError> {
    match state.resolver.resolve(&RouteToken::new([LOGIN_ROUTE])) {
        Some(href) => Ok(Redirect::to(&href).into_response()),
        None => Err(unresolved),
    }
}
