// Registry trait for the external route configuration
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route '{0}' is not registered")]
    NotRegistered(String),
    #[error("route '{0}' requires an argument")]
    MissingArgument(String),
    #[error("route lookup failed: {0}")]
    Fault(String),
}

impl RouteError {
    pub fn is_not_registered(&self) -> bool {
        matches!(self, RouteError::NotRegistered(_))
    }
}

pub trait RouteRegistry: Send + Sync {
    /// Build the concrete link for a route name, passing the optional
    /// positional argument.
    fn reverse(&self, name: &str, arg: Option<&str>) -> Result<String, RouteError>;
}
