use crate::errors::{AppError, AppResult};
use crate::models::{
    CardGroup, DashboardSection, DisplayConfiguration, MetricCard, MetricsSnapshot, Screen, Timeline, TimelineEntry,
};
use crate::provider::MetricsProvider;
use crate::render::dashboard::{render_sections, snapshot_cards};
use crate::render::LayoutNode;
use crate::scheduler;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

// The last successful snapshot is only a fallback for failed or slow fetches.
#[derive(Clone)]
pub struct DashboardHost {
    provider: Arc<dyn MetricsProvider>,
    fetch_timeout: Duration,
    last_snapshot: Arc<Mutex<Option<MetricsSnapshot>>>,
}

impl DashboardHost {
    pub fn new(provider: Arc<dyn MetricsProvider>, fetch_timeout: Duration) -> Self {
        Self {
            provider,
            fetch_timeout,
            last_snapshot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn placeholder_entry(&self) -> TimelineEntry {
        scheduler::placeholder_entry(Utc::now())
    }

    pub async fn snapshot_entry(&self, configuration: DisplayConfiguration) -> AppResult<TimelineEntry> {
        let snapshot = self.current_snapshot().await?;
        Ok(scheduler::snapshot_entry(configuration, &snapshot, Utc::now()))
    }

    pub async fn timeline(&self, configuration: DisplayConfiguration) -> AppResult<Timeline> {
        self.timeline_at(configuration, Utc::now()).await
    }

    pub async fn timeline_at(&self, configuration: DisplayConfiguration, now: DateTime<Utc>) -> AppResult<Timeline> {
        let snapshot = self.current_snapshot().await?;
        let timeline = scheduler::schedule(configuration, &snapshot, now).map_err(|error| {
            tracing::error!(
                display_mode = configuration.display_mode.as_str(),
                error = %error,
                "timeline scheduling failed"
            );
            error
        })?;
        tracing::debug!(
            timeline_id = %timeline.id,
            display_mode = configuration.display_mode.as_str(),
            color_theme = configuration.color_theme.as_str(),
            entries = timeline.entries.len(),
            "timeline scheduled"
        );
        Ok(timeline)
    }

    pub async fn render_screen(&self, screen: Screen) -> AppResult<LayoutNode> {
        let mut groups = Vec::with_capacity(screen.sections().len());
        for section in screen.sections() {
            let cards = match section {
                DashboardSection::Today => snapshot_cards(&self.current_snapshot().await?),
                _ => self.fetch_cards(*section).await?,
            };
            groups.push(CardGroup {
                section: *section,
                cards,
            });
        }
        Ok(render_sections(&groups))
    }

    pub async fn last_snapshot(&self) -> Option<MetricsSnapshot> {
        *self.last_snapshot.lock().await
    }

    async fn current_snapshot(&self) -> AppResult<MetricsSnapshot> {
        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                *self.last_snapshot.lock().await = Some(snapshot);
                Ok(snapshot)
            }
            Err(error) => {
                let fallback = *self.last_snapshot.lock().await;
                match fallback {
                    Some(snapshot) => {
                        tracing::warn!(
                            provider = self.provider.name(),
                            error = %error,
                            "metrics fetch failed; using last known snapshot"
                        );
                        Ok(snapshot)
                    }
                    None => Err(error),
                }
            }
        }
    }

    async fn fetch_snapshot(&self) -> AppResult<MetricsSnapshot> {
        let snapshot = tokio::time::timeout(self.fetch_timeout, self.provider.fetch_snapshot())
            .await
            .map_err(|_| self.timed_out())??;
        snapshot.validate()?;
        Ok(snapshot)
    }

    async fn fetch_cards(&self, section: DashboardSection) -> AppResult<Vec<MetricCard>> {
        tokio::time::timeout(self.fetch_timeout, self.provider.fetch_cards(section))
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|error| {
                tracing::warn!(
                    provider = self.provider.name(),
                    section = section.title(),
                    error = %error,
                    "card fetch failed"
                );
                error
            })
    }

    fn timed_out(&self) -> AppError {
        AppError::DataUnavailable(format!(
            "{} provider did not respond within {}ms",
            self.provider.name(),
            self.fetch_timeout.as_millis()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::DashboardHost;
    use crate::errors::{AppError, AppResult};
    use crate::models::{DashboardSection, DisplayConfiguration, MetricCard, MetricsSnapshot, Screen};
    use crate::provider::{MetricsProvider, ProviderFuture, SampleMetricsProvider};
    use crate::render::LayoutNode;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    enum Step {
        Ok(MetricsSnapshot),
        Fail,
        Hang,
    }

    struct ScriptedProvider {
        steps: Mutex<VecDeque<Step>>,
    }

    impl ScriptedProvider {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
            }
        }
    }

    impl MetricsProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn fetch_snapshot(&self) -> ProviderFuture<'_, MetricsSnapshot> {
            let step = self.steps.lock().expect("steps lock").pop_front().unwrap_or(Step::Fail);
            Box::pin(async move {
                match step {
                    Step::Ok(snapshot) => Ok(snapshot),
                    Step::Fail => Err(AppError::DataUnavailable("backend offline".to_string())),
                    Step::Hang => {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Err(AppError::DataUnavailable("unreachable".to_string()))
                    }
                }
            })
        }

        fn fetch_cards(&self, _section: DashboardSection) -> ProviderFuture<'_, Vec<MetricCard>> {
            let result: AppResult<Vec<MetricCard>> = Err(AppError::DataUnavailable("no cards".to_string()));
            Box::pin(async move { result })
        }
    }

    fn snapshot(customers: u32) -> MetricsSnapshot {
        MetricsSnapshot {
            customers_today: customers,
            ..MetricsSnapshot::placeholder()
        }
    }

    #[tokio::test]
    async fn failure_without_history_is_data_unavailable() {
        let host = DashboardHost::new(Arc::new(ScriptedProvider::new(vec![Step::Fail])), Duration::from_secs(1));
        let err = host
            .timeline(DisplayConfiguration::default())
            .await
            .expect_err("no snapshot to fall back on");
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn failure_falls_back_to_last_good_snapshot() {
        let provider = ScriptedProvider::new(vec![Step::Ok(snapshot(11)), Step::Fail]);
        let host = DashboardHost::new(Arc::new(provider), Duration::from_secs(1));

        let first = host.timeline(DisplayConfiguration::default()).await.expect("first timeline");
        let second = host.timeline(DisplayConfiguration::default()).await.expect("fallback timeline");
        assert_eq!(first.entries[0].snapshot.customers_today, 11);
        assert_eq!(second.entries[0].snapshot.customers_today, 11);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn slow_provider_times_out_to_fallback() {
        let provider = ScriptedProvider::new(vec![Step::Ok(snapshot(4)), Step::Hang, Step::Ok(snapshot(6))]);
        let host = DashboardHost::new(Arc::new(provider), Duration::from_millis(20));

        host.snapshot_entry(DisplayConfiguration::default()).await.expect("seed snapshot");
        let fallback = host
            .snapshot_entry(DisplayConfiguration::default())
            .await
            .expect("timed out fetch falls back");
        assert_eq!(fallback.display_value(), "4");

        let fresh = host.snapshot_entry(DisplayConfiguration::default()).await.expect("fresh snapshot");
        assert_eq!(fresh.display_value(), "6");
        assert_eq!(host.last_snapshot().await, Some(snapshot(6)));
    }

    #[tokio::test]
    async fn invalid_snapshot_is_not_remembered() {
        let bad = MetricsSnapshot {
            total_revenue: f64::NAN,
            ..MetricsSnapshot::placeholder()
        };
        let host = DashboardHost::new(
            Arc::new(ScriptedProvider::new(vec![Step::Ok(bad)])),
            Duration::from_secs(1),
        );
        assert!(host.snapshot_entry(DisplayConfiguration::default()).await.is_err());
        assert!(host.last_snapshot().await.is_none());
    }

    #[tokio::test]
    async fn card_failures_propagate() {
        let provider = ScriptedProvider::new(vec![Step::Ok(snapshot(1))]);
        let host = DashboardHost::new(Arc::new(provider), Duration::from_secs(1));
        let err = host
            .render_screen(Screen::BusinessHealth)
            .await
            .expect_err("cards unavailable");
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn screens_use_their_own_section_grouping() {
        let host = DashboardHost::new(Arc::new(SampleMetricsProvider::new()), Duration::from_secs(1));
        for screen in Screen::ALL {
            let layout = host.render_screen(screen).await.expect("render screen");
            let titles = layout
                .children()
                .iter()
                .filter_map(|node| match node {
                    LayoutNode::Card { title, .. } => Some(title.clone()),
                    _ => None,
                })
                .collect::<Vec<_>>();
            let expected = screen
                .sections()
                .iter()
                .map(|section| section.title().to_string())
                .collect::<Vec<_>>();
            assert_eq!(titles, expected);
        }
    }
}
