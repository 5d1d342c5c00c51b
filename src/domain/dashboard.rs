// Dashboard domain model - the composite view handed to the renderer
use super::card::Card;
use super::route::Link;
use serde::Serialize;

/// Dashboard button. Only actions with a resolved href make it into the
/// final view model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub label: String,
    pub icon: Option<String>,
    pub href: Option<String>,
    pub variant: String,
    pub aria_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    pub href: Link,
}

impl Crumb {
    pub fn new(label: impl Into<String>, href: Link) -> Self {
        Self {
            label: label.into(),
            href,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiTile {
    pub label: String,
    pub value: i64,
    pub icon: Option<String>,
}

impl KpiTile {
    pub fn new(label: impl Into<String>, value: i64, icon: Option<&str>) -> Self {
        Self {
            label: label.into(),
            value,
            icon: icon.map(str::to_string),
        }
    }
}

/// Every section is always present, empty when its provider failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardViewModel {
    pub crumbs: Vec<Crumb>,
    pub actions: Vec<Action>,
    pub kpis: Vec<KpiTile>,
    pub appointments: Vec<Card>,
    pub shifts: Vec<Card>,
    pub patients: Vec<Card>,
    pub reports: Vec<Card>,
}
