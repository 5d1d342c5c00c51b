// Principal extraction from headers set by the upstream auth layer
use crate::domain::principal::{Principal, Role};
use crate::presentation::error::ApiError;
use axum::http::HeaderMap;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, ApiError> {
    let id = header(headers, USER_ID_HEADER).ok_or(ApiError::Unauthorized)?;
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadPrincipal(format!("invalid user id '{}'", id)))?;

    let role: Role = header(headers, USER_ROLE_HEADER)
        .ok_or(ApiError::Unauthorized)?
        .parse()
        .map_err(ApiError::BadPrincipal)?;

    let username = header(headers, USER_NAME_HEADER).unwrap_or_default();
    Ok(Principal::new(id, username, role))
}
