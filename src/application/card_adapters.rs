// Card adapters - map domain records onto the uniform card shape
use crate::application::route_resolver::RouteResolver;
use crate::domain::card::{Badge, BadgeVariant, Card, CardKpi};
use crate::domain::records::{Appointment, Patient, Report, Shift};
use crate::domain::route::{Link, RouteToken};
use chrono::{FixedOffset, NaiveTime};
use std::sync::Arc;

const APPOINTMENT_ROUTES: [&str; 3] = [
    "appointments:detail",
    "appointments:appointment-list",
    "appointments:appointment-api-detail",
];
const SHIFT_ROUTES: [&str; 4] = [
    "schedules:schedule-dashboard",
    "schedules:doctor-schedules",
    "schedules:schedule-calendar",
    "schedules:schedules",
];
const PATIENT_ROUTES: [&str; 3] = ["patients:detail", "patients:profile", "patients:dashboard"];
const REPORT_ROUTES: [&str; 1] = ["reports:dashboard"];

const SCHEDULED_FORMAT: &str = "%b %d, %Y %I:%M %p";
const CLOCK_FORMAT: &str = "%H:%M";

/// Total mapping from one record family to a [`Card`].
pub trait CardAdapter<R> {
    fn adapt(&self, record: &R) -> Card;
}

#[derive(Clone)]
pub struct CardAdapters {
    resolver: Arc<RouteResolver>,
    offset: FixedOffset,
}

impl CardAdapters {
    pub fn new(resolver: Arc<RouteResolver>, offset: FixedOffset) -> Self {
        Self { resolver, offset }
    }

    pub fn adapt_all<R>(&self, records: &[R]) -> Vec<Card>
    where
        Self: CardAdapter<R>,
    {
        records.iter().map(|record| self.adapt(record)).collect()
    }

    fn link(&self, token: RouteToken) -> Link {
        self.resolver.resolve(&token).into()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

impl CardAdapter<Appointment> for CardAdapters {
    fn adapt(&self, appointment: &Appointment) -> Card {
        let title = appointment
            .counterpart_name()
            .or_else(|| non_blank(&appointment.title))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Appointment #{}", appointment.id));

        let when = appointment.scheduled_time.map(|scheduled| {
            scheduled
                .with_timezone(&self.offset)
                .format(SCHEDULED_FORMAT)
                .to_string()
        });

        let mut card = Card::new(title.clone(), format!("Appointment with {}", title));
        card.subtitle = when
            .clone()
            .or_else(|| non_blank(&appointment.reason).map(str::to_string))
            .unwrap_or_default();
        card.badges = non_blank(&appointment.status)
            .map(|status| Badge::new(status, BadgeVariant::Warning))
            .into_iter()
            .collect();
        card.kpis = when.map(|w| CardKpi::new("When", w)).into_iter().collect();
        card.href = self.link(RouteToken::new(APPOINTMENT_ROUTES).with_arg(appointment.id));
        card
    }
}

impl CardAdapter<Shift> for CardAdapters {
    fn adapt(&self, shift: &Shift) -> Card {
        let title = non_blank(&shift.duty_type)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Shift {}", shift.id));

        let day = shift
            .day_label()
            .map(str::to_string)
            .or_else(|| shift.day_of_week.map(|index| format!("Day {}", index)));
        let hours = match (shift.start_time, shift.end_time) {
            (Some(start), Some(end)) => Some(format!("{}–{}", clock(start), clock(end))),
            (Some(start), None) => Some(format!("from {}", clock(start))),
            (None, Some(end)) => Some(format!("until {}", clock(end))),
            (None, None) => None,
        };

        let mut card = Card::new(title.clone(), format!("Shift {}", title));
        card.subtitle = [day, hours].into_iter().flatten().collect::<Vec<_>>().join(" ");
        card.badges = shift
            .is_active
            .map(|active| {
                let label = if active { "Active" } else { "Inactive" };
                Badge::new(label, BadgeVariant::Info)
            })
            .into_iter()
            .collect();
        card.kpis = shift
            .duration_minutes()
            .map(|minutes| CardKpi::new("Duration", format!("{}m", minutes)))
            .into_iter()
            .collect();
        card.href = self.link(RouteToken::new(SHIFT_ROUTES));
        card
    }
}

impl CardAdapter<Patient> for CardAdapters {
    fn adapt(&self, patient: &Patient) -> Card {
        let title = patient
            .display_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Patient #{}", patient.id));

        let mut card = Card::new(title.clone(), format!("Patient {}", title));
        card.subtitle = non_blank(&patient.phone).unwrap_or_default().to_string();
        card.image_ref = non_blank(&patient.avatar_url).map(str::to_string);
        card.href = self.link(RouteToken::new(PATIENT_ROUTES).with_arg(patient.id));
        card
    }
}

// Reports have no per-record page; every card links to the reports dashboard.
impl CardAdapter<Report> for CardAdapters {
    fn adapt(&self, report: &Report) -> Card {
        let title = non_blank(&report.title)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Report #{}", report.id));

        let mut card = Card::new(title.clone(), format!("Report {}", title));
        card.subtitle = non_blank(&report.description).unwrap_or_default().to_string();
        card.href = self.link(RouteToken::new(REPORT_ROUTES));
        card
    }
}
