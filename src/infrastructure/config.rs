use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
    pub routes: Vec<RouteEntry>,
    pub fixtures: FixtureSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub provider_timeout_ms: u64,
    pub display_utc_offset_minutes: i32,
    pub namespace_aliases: Vec<NamespaceAlias>,
    pub shift_fallbacks: Vec<String>,
    pub actions: Vec<ActionConfig>,
    pub crumbs: Vec<CrumbConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NamespaceAlias {
    pub alias: String,
    pub replacement: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActionConfig {
    pub label: String,
    pub icon: Option<String>,
    pub routes: Vec<String>,
    #[serde(default = "default_variant")]
    pub variant: String,
    pub aria_label: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CrumbConfig {
    pub label: String,
    pub href: Option<String>,
    #[serde(default)]
    pub routes: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RouteEntry {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FixtureSettings {
    pub path: String,
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            path: "config/fixtures.json".to_string(),
        }
    }
}

fn default_variant() -> String {
    "primary".to_string()
}

impl DashboardSettings {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn display_offset(&self) -> FixedOffset {
        self.display_utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!(
                    minutes = self.display_utc_offset_minutes,
                    "Display offset out of range, using UTC"
                );
                Utc.fix()
            })
    }
}

fn action(label: &str, icon: &str, route: &str, variant: &str) -> ActionConfig {
    ActionConfig {
        label: label.to_string(),
        icon: Some(icon.to_string()),
        routes: vec![route.to_string()],
        variant: variant.to_string(),
        aria_label: None,
    }
}

fn crumb(label: &str, href: Option<&str>) -> CrumbConfig {
    CrumbConfig {
        label: label.to_string(),
        href: href.map(str::to_string),
        routes: Vec::new(),
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            provider_timeout_ms: 2000,
            display_utc_offset_minutes: 0,
            namespace_aliases: vec![NamespaceAlias {
                alias: "shifts".to_string(),
                replacement: "schedules".to_string(),
            }],
            shift_fallbacks: [
                "get_upcoming_shifts_for_doctor",
                "get_shifts_for_doctor",
                "get_upcoming_shifts",
                "schedules_dashboard",
            ]
            .map(str::to_string)
            .to_vec(),
            actions: vec![
                action("My Appointments", "📅", "appointments:appointment-list", "primary"),
                action("My Patients", "🧑‍⚕️", "patients:dashboard", "success"),
                action("My Schedules", "🕒", "schedules:schedule-dashboard", "info"),
                action("My Reports", "📊", "reports:dashboard", "secondary"),
            ],
            crumbs: vec![
                crumb("Home", Some("/")),
                crumb("Doctors", Some("/doctors/")),
                crumb("Dashboard", None),
            ],
        }
    }
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("MEDBOARD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut app_config: AppConfig = settings.try_deserialize()?;
    if app_config.routes.is_empty() {
        app_config.routes = default_routes();
    }
    Ok(app_config)
}

/// Route table used when the configuration does not ship one.
pub fn default_routes() -> Vec<RouteEntry> {
    [
        ("home", "/"),
        ("accounts:login", "/accounts/login/"),
        ("doctors:doctor-list", "/doctors/"),
        ("doctors:dashboard", "/doctors/dashboard/"),
        ("appointments:appointment-list", "/appointments/"),
        ("appointments:detail", "/appointments/{arg}/"),
        ("appointments:appointment-api-detail", "/appointments/api/{arg}/"),
        ("patients:dashboard", "/patients/dashboard/"),
        ("patients:detail", "/patients/profile/{arg}/"),
        ("schedules:schedule-dashboard", "/schedules/"),
        ("reports:dashboard", "/reports/"),
        ("hospitals:dashboard", "/hospitals/dashboard/"),
        ("adminpanel:dashboard", "/adminpanel/"),
    ]
    .into_iter()
    .map(|(name, path)| RouteEntry {
        name: name.to_string(),
        path: path.to_string(),
    })
    .collect()
}
