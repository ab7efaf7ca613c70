use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

// ─── Metrics ────────────────────────────────────────────────────────────────

// overdue_tasks is not bounded by tasks_due_today.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub customers_today: u32,
    pub tasks_due_today: u32,
    pub overdue_tasks: u32,
    pub total_revenue: f64,
    pub pending_invoices: u32,
}

impl MetricsSnapshot {
    pub fn placeholder() -> Self {
        Self {
            customers_today: 5,
            tasks_due_today: 8,
            overdue_tasks: 2,
            total_revenue: 12_450.0,
            pending_invoices: 3,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if !self.total_revenue.is_finite() || self.total_revenue < 0.0 {
            return Err(AppError::DataUnavailable(format!(
                "Snapshot revenue must be a non-negative amount, got {}",
                self.total_revenue
            )));
        }
        Ok(())
    }

    pub fn count_for(&self, metric: ActiveMetric) -> u32 {
        match metric {
            ActiveMetric::Customers => self.customers_today,
            ActiveMetric::Tasks => self.tasks_due_today,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActiveMetric {
    Customers,
    Tasks,
}

impl ActiveMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Tasks => "tasks",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Customers => "Customers Today",
            Self::Tasks => "Tasks Due",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Customers => Self::Tasks,
            Self::Tasks => Self::Customers,
        }
    }
}

// ─── Display Configuration ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    CustomersOnly,
    TasksOnly,
    #[default]
    Alternating,
}

impl DisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CustomersOnly => "customers-only",
            Self::TasksOnly => "tasks-only",
            Self::Alternating => "alternating",
        }
    }

    pub fn initial_metric(self) -> ActiveMetric {
        match self {
            Self::TasksOnly => ActiveMetric::Tasks,
            Self::CustomersOnly | Self::Alternating => ActiveMetric::Customers,
        }
    }
}

impl FromStr for DisplayMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "customers-only" | "customers" => Ok(Self::CustomersOnly),
            "tasks-only" | "tasks" => Ok(Self::TasksOnly),
            "alternating" | "alternate" => Ok(Self::Alternating),
            other => Err(AppError::ConfigurationInvalid(format!(
                "Unknown display mode: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorTheme {
    #[default]
    Blue,
    Green,
    Teal,
}

impl ColorTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Teal => "teal",
        }
    }

    pub fn colors(self) -> ThemeColors {
        match self {
            Self::Blue => ThemeColors {
                primary: "#007AFF",
                secondary: "#5AC8FA",
            },
            Self::Green => ThemeColors {
                primary: "#34C759",
                secondary: "#A8E6B8",
            },
            Self::Teal => ThemeColors {
                primary: "#30B0C7",
                secondary: "#9ED9E3",
            },
        }
    }
}

impl FromStr for ColorTheme {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "teal" => Ok(Self::Teal),
            other => Err(AppError::ConfigurationInvalid(format!(
                "Unknown color theme: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: &'static str,
    pub secondary: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfiguration {
    pub display_mode: DisplayMode,
    pub color_theme: ColorTheme,
}

impl DisplayConfiguration {
    pub fn new(display_mode: DisplayMode, color_theme: ColorTheme) -> Self {
        Self {
            display_mode,
            color_theme,
        }
    }

    pub fn resolve(display_mode: Option<&str>, color_theme: Option<&str>) -> Self {
        let display_mode = display_mode
            .map(|raw| {
                raw.parse::<DisplayMode>().unwrap_or_else(|error| {
                    tracing::warn!(error = %error, "falling back to default display mode");
                    DisplayMode::default()
                })
            })
            .unwrap_or_default();
        let color_theme = color_theme
            .map(|raw| {
                raw.parse::<ColorTheme>().unwrap_or_else(|error| {
                    tracing::warn!(error = %error, "falling back to default color theme");
                    ColorTheme::default()
                })
            })
            .unwrap_or_default();
        Self::new(display_mode, color_theme)
    }
}

// ─── Widget Timeline ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub timestamp: DateTime<Utc>,
    pub configuration: DisplayConfiguration,
    pub snapshot: MetricsSnapshot,
    pub active_metric: ActiveMetric,
}

impl TimelineEntry {
    pub fn display_value(&self) -> String {
        self.snapshot.count_for(self.active_metric).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    AtEnd,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<TimelineEntry>,
    pub policy: RefreshPolicy,
}

impl Timeline {
    pub fn new(generated_at: DateTime<Utc>, entries: Vec<TimelineEntry>, policy: RefreshPolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at,
            entries,
            policy,
        }
    }

    // The last entry stays active until the host refreshes.
    pub fn active_entry(&self, at: DateTime<Utc>) -> Option<&TimelineEntry> {
        self.entries.iter().rev().find(|entry| entry.timestamp <= at)
    }

    pub fn refresh_at(&self) -> Option<DateTime<Utc>> {
        match self.policy {
            RefreshPolicy::AtEnd => self.entries.last().map(|entry| entry.timestamp),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetField {
    ActiveValue,
    ActiveLabel,
    SecondaryValue,
    SecondaryLabel,
    OverdueTasks,
    TotalRevenue,
    PendingInvoices,
    UpdatedAt,
}

// ─── Dashboard Cards ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub subtitle: String,
    pub trend_direction: TrendDirection,
    pub trend_text: String,
    pub is_positive: bool,
}

impl MetricCard {
    pub fn new(
        title: &str,
        value: &str,
        subtitle: &str,
        trend_direction: TrendDirection,
        trend_text: &str,
        is_positive: bool,
    ) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
            subtitle: subtitle.to_string(),
            trend_direction,
            trend_text: trend_text.to_string(),
            is_positive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DashboardSection {
    Today,
    ThisWeek,
    Monthly,
    YearToDate,
}

impl DashboardSection {
    pub fn title(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
            Self::Monthly => "Monthly",
            Self::YearToDate => "Year to Date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardGroup {
    pub section: DashboardSection,
    pub cards: Vec<MetricCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Dashboard,
    BusinessHealth,
}

impl Screen {
    pub const ALL: [Screen; 2] = [Screen::Dashboard, Screen::BusinessHealth];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::BusinessHealth => "business-health",
        }
    }

    pub fn sections(self) -> &'static [DashboardSection] {
        match self {
            Self::Dashboard => &[DashboardSection::Today, DashboardSection::ThisWeek],
            Self::BusinessHealth => &[
                DashboardSection::ThisWeek,
                DashboardSection::Monthly,
                DashboardSection::YearToDate,
            ],
        }
    }
}

pub fn format_currency(amount: f64) -> String {
    let cents = (amount.max(0.0) * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}.{:02}", grouped, cents % 100)
}
