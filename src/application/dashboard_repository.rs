// Provider traits for dashboard data access
use crate::domain::principal::Principal;
use crate::domain::records::{Appointment, Patient, Report, Shift};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider does not exist in this deployment.
    #[error("{0} provider is not available")]
    Unavailable(&'static str),
    #[error("provider timed out after {0:?}")]
    Timeout(Duration),
    #[error("provider panicked: {0}")]
    Panicked(String),
    #[error("provider returned malformed data: {0}")]
    Malformed(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Data providers for each dashboard section.
///
/// Every method is independently fallible. The defaults report the provider as
/// unavailable, so a backend only implements what it actually serves.
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn upcoming_appointments(
        &self,
        _principal: &Principal,
    ) -> Result<Vec<Appointment>, ProviderError> {
        Err(ProviderError::Unavailable("appointments"))
    }

    async fn upcoming_shifts(&self, _principal: &Principal) -> Result<Vec<Shift>, ProviderError> {
        Err(ProviderError::Unavailable("shifts"))
    }

    async fn active_patients(&self, _principal: &Principal) -> Result<Vec<Patient>, ProviderError> {
        Err(ProviderError::Unavailable("patients"))
    }

    async fn recent_reports(&self, _principal: &Principal) -> Result<Vec<Report>, ProviderError> {
        Err(ProviderError::Unavailable("reports"))
    }

    async fn count_todays_appointments(&self, _principal: &Principal) -> Result<i64, ProviderError> {
        Err(ProviderError::Unavailable("today appointments"))
    }

    async fn count_current_oncall(&self, _principal: &Principal) -> Result<i64, ProviderError> {
        Err(ProviderError::Unavailable("on-call"))
    }

    async fn count_active_patients(&self, _principal: &Principal) -> Result<i64, ProviderError> {
        Err(ProviderError::Unavailable("active patients"))
    }
}

/// One shift-loading strategy of the secondary schedules module.
#[async_trait]
pub trait ShiftLoader: Send + Sync {
    async fn load(&self, principal: &Principal) -> Result<Vec<Shift>, ProviderError>;
}
