// Card domain model - uniform render-ready summary of one record
use super::route::Link;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Info,
    Warning,
    Success,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub variant: BadgeVariant,
}

impl Badge {
    pub fn new(label: impl Into<String>, variant: BadgeVariant) -> Self {
        Self {
            label: label.into(),
            variant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardKpi {
    pub label: String,
    pub value: String,
}

impl CardKpi {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Every field is always present; sparse records produce empty defaults,
/// and a `Disabled` href tells the renderer to show an inert card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub subtitle: String,
    #[serde(rename = "image_url")]
    pub image_ref: Option<String>,
    pub badges: Vec<Badge>,
    pub kpis: Vec<CardKpi>,
    pub href: Link,
    pub aria_label: String,
}

impl Card {
    pub fn new(title: String, aria_label: String) -> Self {
        Self {
            title,
            subtitle: String::new(),
            image_ref: None,
            badges: Vec::new(),
            kpis: Vec::new(),
            href: Link::Disabled,
            aria_label,
        }
    }
}
