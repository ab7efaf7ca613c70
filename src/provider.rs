use crate::errors::{AppError, AppResult};
use crate::models::{DashboardSection, MetricCard, MetricsSnapshot, TrendDirection};
use crate::render::dashboard::snapshot_cards;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

pub trait MetricsProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn fetch_snapshot(&self) -> ProviderFuture<'_, MetricsSnapshot>;
    fn fetch_cards(&self, section: DashboardSection) -> ProviderFuture<'_, Vec<MetricCard>>;
}

static THIS_WEEK: Lazy<Vec<MetricCard>> = Lazy::new(|| {
    vec![
        MetricCard::new("New Customers", "23", "vs. last week", TrendDirection::Up, "+12%", true),
        MetricCard::new("Tasks Completed", "47", "vs. last week", TrendDirection::Up, "+8%", true),
        MetricCard::new("Revenue", "$8,240.00", "vs. last week", TrendDirection::Down, "-3%", false),
        MetricCard::new("Invoices Sent", "12", "vs. last week", TrendDirection::Flat, "0%", false),
    ]
});

static MONTHLY: Lazy<Vec<MetricCard>> = Lazy::new(|| {
    vec![
        MetricCard::new("Monthly Revenue", "$34,580.00", "vs. last month", TrendDirection::Up, "+15%", true),
        MetricCard::new("Active Customers", "156", "vs. last month", TrendDirection::Up, "+6%", true),
        MetricCard::new("Average Invoice", "$412.00", "vs. last month", TrendDirection::Flat, "0%", false),
        MetricCard::new("Overdue Rate", "4.2%", "vs. last month", TrendDirection::Down, "-1.1%", true),
    ]
});

static YEAR_TO_DATE: Lazy<Vec<MetricCard>> = Lazy::new(|| {
    vec![
        MetricCard::new("Total Revenue", "$289,400.00", "vs. last year", TrendDirection::Up, "+22%", true),
        MetricCard::new("Customer Retention", "91%", "vs. last year", TrendDirection::Up, "+2%", true),
        MetricCard::new("Outstanding", "$18,920.00", "vs. last year", TrendDirection::Down, "-5%", true),
    ]
});

// Only the Today section reads a snapshot; period sections are fixed lists.
fn sample_cards(
    section: DashboardSection,
    snapshot: impl FnOnce() -> AppResult<MetricsSnapshot>,
) -> AppResult<Vec<MetricCard>> {
    match section {
        DashboardSection::Today => Ok(snapshot_cards(&snapshot()?)),
        DashboardSection::ThisWeek => Ok(THIS_WEEK.clone()),
        DashboardSection::Monthly => Ok(MONTHLY.clone()),
        DashboardSection::YearToDate => Ok(YEAR_TO_DATE.clone()),
    }
}

#[derive(Debug, Clone)]
pub struct SampleMetricsProvider {
    snapshot: MetricsSnapshot,
}

impl SampleMetricsProvider {
    pub fn new() -> Self {
        Self {
            snapshot: MetricsSnapshot::placeholder(),
        }
    }

    pub fn with_snapshot(snapshot: MetricsSnapshot) -> Self {
        Self { snapshot }
    }
}

impl Default for SampleMetricsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for SampleMetricsProvider {
    fn name(&self) -> &'static str {
        "sample"
    }

    fn fetch_snapshot(&self) -> ProviderFuture<'_, MetricsSnapshot> {
        let result: AppResult<MetricsSnapshot> = Ok(self.snapshot);
        Box::pin(async move { result })
    }

    fn fetch_cards(&self, section: DashboardSection) -> ProviderFuture<'_, Vec<MetricCard>> {
        let snapshot = self.snapshot;
        let result = sample_cards(section, || Ok(snapshot));
        Box::pin(async move { result })
    }
}

#[derive(Debug)]
pub struct PreviewMetricsProvider {
    rng: Mutex<StdRng>,
}

impl PreviewMetricsProvider {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng: Mutex::new(rng) }
    }

    fn next_snapshot(&self) -> AppResult<MetricsSnapshot> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AppError::Internal("Preview generator lock poisoned".to_string()))?;
        let cents: u64 = rng.random_range(0..=5_000_000);
        Ok(MetricsSnapshot {
            customers_today: rng.random_range(1..=20),
            tasks_due_today: rng.random_range(1..=15),
            overdue_tasks: rng.random_range(0..=5),
            total_revenue: cents as f64 / 100.0,
            pending_invoices: rng.random_range(0..=10),
        })
    }
}

impl MetricsProvider for PreviewMetricsProvider {
    fn name(&self) -> &'static str {
        "preview"
    }

    fn fetch_snapshot(&self) -> ProviderFuture<'_, MetricsSnapshot> {
        let result = self.next_snapshot();
        Box::pin(async move { result })
    }

    fn fetch_cards(&self, section: DashboardSection) -> ProviderFuture<'_, Vec<MetricCard>> {
        let result = sample_cards(section, || self.next_snapshot());
        Box::pin(async move { result })
    }
}
