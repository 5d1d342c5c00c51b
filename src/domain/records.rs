// Domain records handed over by the data providers.
// Only the identifier is mandatory; every other attribute may be missing.
use chrono::{DateTime, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Optional attribute that decodes to `None` when its value has the wrong
/// shape, so one bad attribute never costs the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Option::<T>::deserialize(value).ok().flatten())
}

/// First non-blank candidate.
fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// The other party of an appointment as seen by the doctor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PersonRef {
    #[serde(default, deserialize_with = "lenient")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
}

impl PersonRef {
    pub fn display_name(&self) -> Option<&str> {
        first_present(&[self.full_name.as_deref(), self.username.as_deref()])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub patient: Option<PersonRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
}

impl Appointment {
    pub fn counterpart_name(&self) -> Option<&str> {
        self.patient.as_ref().and_then(PersonRef::display_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Shift {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub duty_type: Option<String>,
    /// 0 = Monday .. 6 = Sunday.
    #[serde(default, deserialize_with = "lenient")]
    pub day_of_week: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_active: Option<bool>,
}

impl Shift {
    pub fn day_label(&self) -> Option<&'static str> {
        self.day_of_week
            .and_then(|day| WEEKDAYS.get(usize::from(day)).copied())
    }

    /// Length of the shift; shifts ending before they start run past midnight.
    pub fn duration_minutes(&self) -> Option<i64> {
        let (start, end) = (self.start_time?, self.end_time?);
        let minutes = (end - start).num_minutes();
        Some(if minutes < 0 { minutes + 24 * 60 } else { minutes })
    }

    pub fn covers(&self, day_of_week: u8, at: NaiveTime) -> bool {
        if self.is_active == Some(false) || self.day_of_week != Some(day_of_week) {
            return false;
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if start <= end => start <= at && at < end,
            (Some(start), Some(end)) => at >= start || at < end,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Patient {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub avatar_url: Option<String>,
}

impl Patient {
    pub fn display_name(&self) -> Option<&str> {
        first_present(&[self.full_name.as_deref(), self.username.as_deref()])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Report {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}
