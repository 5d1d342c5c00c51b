// Fixture-backed repository implementation
use crate::application::dashboard_repository::{DashboardRepository, ProviderError, ShiftLoader};
use crate::domain::principal::Principal;
use crate::domain::records::{Appointment, Patient, Report, Shift};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const UPCOMING_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct FixtureDocument {
    #[serde(default)]
    doctors: HashMap<i64, DoctorFixture>,
}

/// Sections are kept raw and decoded per request. A missing section means the
/// provider does not exist for this deployment.
#[derive(Debug, Default, Deserialize)]
struct DoctorFixture {
    appointments: Option<Value>,
    shifts: Option<Value>,
    patients: Option<Value>,
    reports: Option<Value>,
    schedule_shifts: Option<Value>,
}

#[derive(Debug, Clone, Copy)]
enum SectionKind {
    Appointments,
    Shifts,
    Patients,
    Reports,
    ScheduleShifts,
}

impl SectionKind {
    fn name(self) -> &'static str {
        match self {
            SectionKind::Appointments => "appointments",
            SectionKind::Shifts => "shifts",
            SectionKind::Patients => "patients",
            SectionKind::Reports => "reports",
            SectionKind::ScheduleShifts => "schedule_shifts",
        }
    }

    fn pick(self, doctor: &DoctorFixture) -> Option<&Value> {
        match self {
            SectionKind::Appointments => doctor.appointments.as_ref(),
            SectionKind::Shifts => doctor.shifts.as_ref(),
            SectionKind::Patients => doctor.patients.as_ref(),
            SectionKind::Reports => doctor.reports.as_ref(),
            SectionKind::ScheduleShifts => doctor.schedule_shifts.as_ref(),
        }
    }
}

#[derive(Debug)]
pub struct FixtureRepository {
    doctors: HashMap<i64, DoctorFixture>,
    fixed_now: Option<DateTime<Utc>>,
    /// Wall clock that "today" and shift hours are measured in.
    offset: FixedOffset,
}

impl Default for FixtureRepository {
    fn default() -> Self {
        Self {
            doctors: HashMap::new(),
            fixed_now: None,
            offset: Utc.fix(),
        }
    }
}

impl FixtureRepository {
    pub fn from_json(source: &str) -> Result<Self> {
        let document: FixtureDocument =
            serde_json::from_str(source).context("Failed to parse fixture document")?;
        Ok(Self {
            doctors: document.doctors,
            ..Self::default()
        })
    }

    pub fn load(path: &str) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures from {}", path))?;
        let repository = Self::from_json(&source)?;
        tracing::info!(path, doctors = repository.doctors.len(), "Loaded dashboard fixtures");
        Ok(repository)
    }

    /// Pin the clock used for "upcoming", "today" and "on call now".
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    /// Offset the dashboard displays times in.
    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        self.now().with_timezone(&self.offset)
    }

    fn section<T: DeserializeOwned>(
        &self,
        principal: &Principal,
        kind: SectionKind,
    ) -> Result<Vec<T>, ProviderError> {
        // A doctor without fixtures simply has no records
        let Some(doctor) = self.doctors.get(&principal.id) else {
            return Ok(Vec::new());
        };
        let value = kind
            .pick(doctor)
            .ok_or(ProviderError::Unavailable(kind.name()))?;

        let Value::Array(items) = value else {
            return Err(ProviderError::Malformed(format!("{}: expected a list", kind.name())));
        };

        // Only a record without a usable id is dropped
        Ok(items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match T::deserialize(item) {
                Ok(record) => Some(record),
                Err(error) => {
                    tracing::debug!(section = kind.name(), index, %error, "Skipping unreadable record");
                    None
                }
            })
            .collect())
    }

    /// Shift loaders this store offers to the schedules fallback chain.
    pub fn schedule_loaders(self: &Arc<Self>) -> HashMap<String, Arc<dyn ShiftLoader>> {
        let mut loaders: HashMap<String, Arc<dyn ShiftLoader>> = HashMap::new();
        loaders.insert(
            "get_upcoming_shifts_for_doctor".to_string(),
            Arc::new(ScheduleLoader {
                store: self.clone(),
                active_only: true,
            }),
        );
        loaders.insert(
            "get_shifts_for_doctor".to_string(),
            Arc::new(ScheduleLoader {
                store: self.clone(),
                active_only: false,
            }),
        );
        loaders
    }
}

#[async_trait]
impl DashboardRepository for FixtureRepository {
    async fn upcoming_appointments(
        &self,
        principal: &Principal,
    ) -> Result<Vec<Appointment>, ProviderError> {
        let now = self.now();
        let mut appointments: Vec<Appointment> = self
            .section::<Appointment>(principal, SectionKind::Appointments)?
            .into_iter()
            .filter(|a| a.scheduled_time.is_none_or(|at| at >= now))
            .collect();

        // Soonest first, undated last
        appointments.sort_by_key(|a| (a.scheduled_time.is_none(), a.scheduled_time));
        appointments.truncate(UPCOMING_LIMIT);
        Ok(appointments)
    }

    async fn upcoming_shifts(&self, principal: &Principal) -> Result<Vec<Shift>, ProviderError> {
        self.section(principal, SectionKind::Shifts)
    }

    async fn active_patients(&self, principal: &Principal) -> Result<Vec<Patient>, ProviderError> {
        self.section(principal, SectionKind::Patients)
    }

    async fn recent_reports(&self, principal: &Principal) -> Result<Vec<Report>, ProviderError> {
        let mut reports: Vec<Report> = self.section(principal, SectionKind::Reports)?;
        reports.truncate(UPCOMING_LIMIT);
        Ok(reports)
    }

    async fn count_todays_appointments(&self, principal: &Principal) -> Result<i64, ProviderError> {
        let today = self.local_now().date_naive();
        let count = self
            .section::<Appointment>(principal, SectionKind::Appointments)?
            .iter()
            .filter(|a| {
                a.scheduled_time
                    .is_some_and(|at| at.with_timezone(&self.offset).date_naive() == today)
            })
            .count();
        Ok(count as i64)
    }

    async fn count_current_oncall(&self, principal: &Principal) -> Result<i64, ProviderError> {
        let now = self.local_now();
        let weekday = now.weekday().num_days_from_monday() as u8;
        let count = self
            .section::<Shift>(principal, SectionKind::Shifts)?
            .iter()
            .filter(|s| s.covers(weekday, now.time()))
            .count();
        Ok(count as i64)
    }

    async fn count_active_patients(&self, principal: &Principal) -> Result<i64, ProviderError> {
        let patients: Vec<Patient> = self.section(principal, SectionKind::Patients)?;
        Ok(patients.len() as i64)
    }
}

struct ScheduleLoader {
    store: Arc<FixtureRepository>,
    active_only: bool,
}

#[async_trait]
impl ShiftLoader for ScheduleLoader {
    async fn load(&self, principal: &Principal) -> Result<Vec<Shift>, ProviderError> {
        let shifts: Vec<Shift> = self.store.section(principal, SectionKind::ScheduleShifts)?;
        Ok(shifts
            .into_iter()
            .filter(|s| !self.active_only || s.is_active != Some(false))
            .collect())
    }
}
