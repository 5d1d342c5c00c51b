// Symbolic navigation targets and their resolved form
use serde::{Serialize, Serializer};

/// Ordered route candidates plus an optional positional argument.
/// Resolution tries the candidates strictly in order; first success wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteToken {
    pub candidates: Vec<String>,
    pub arg: Option<String>,
}

impl RouteToken {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            arg: None,
        }
    }

    pub fn with_arg(mut self, arg: impl ToString) -> Self {
        self.arg = Some(arg.to_string());
        self
    }
}

/// A navigation target as it travels through the view model.
///
/// Only `Resolved` ever reaches the renderer as a link; `Pending` is settled by
/// the context sanitizer and `Disabled` renders as an inert affordance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Link {
    Resolved(String),
    /// Unresolved route token. `explicit` is an already-known href that wins
    /// over whatever the token resolves to.
    Pending {
        token: RouteToken,
        explicit: Option<String>,
    },
    #[default]
    Disabled,
}

impl Link {
    pub fn href(&self) -> Option<&str> {
        match self {
            Link::Resolved(href) => Some(href),
            _ => None,
        }
    }
}

/// An href that is missing or blank counts as no href at all.
pub fn present_href(href: Option<String>) -> Option<String> {
    href.filter(|href| !href.trim().is_empty())
}

impl From<Option<String>> for Link {
    fn from(href: Option<String>) -> Self {
        present_href(href).map(Link::Resolved).unwrap_or(Link::Disabled)
    }
}

// The rendering boundary only ever sees an href or null.
impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.href() {
            Some(href) => serializer.serialize_str(href),
            None => serializer.serialize_none(),
        }
    }
}
