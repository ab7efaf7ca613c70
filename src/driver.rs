use crate::errors::AppResult;
use crate::host::DashboardHost;
use crate::models::{DisplayConfiguration, SizeClass, Timeline, TimelineEntry};
use crate::render::widget::render_entry;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::future::Future;
use std::io::Write;
use std::pin::Pin;

pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    fn sleep_until(&self, at: DateTime<Utc>) -> SleepFuture<'_>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep_until(&self, at: DateTime<Utc>) -> SleepFuture<'_> {
        let wait = (at - Utc::now()).to_std().unwrap_or_default();
        Box::pin(tokio::time::sleep(wait))
    }
}

pub struct WidgetDriver<'a, C: Clock, W: Write> {
    host: &'a DashboardHost,
    clock: C,
    out: W,
}

impl<'a, C: Clock, W: Write> WidgetDriver<'a, C, W> {
    pub fn new(host: &'a DashboardHost, clock: C, out: W) -> Self {
        Self { host, clock, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // A failed reschedule leaves the last rendered entry on screen and stops.
    pub async fn run(&mut self, configuration: DisplayConfiguration, refresh_cycles: u32) -> AppResult<()> {
        let mut previous: Option<Timeline> = None;
        for cycle in 0..=refresh_cycles {
            let timeline = match self.host.timeline_at(configuration, self.clock.now()).await {
                Ok(timeline) => timeline,
                Err(error) => {
                    let Some(previous) = previous.as_ref() else {
                        return Err(error);
                    };
                    tracing::warn!(cycle, error = %error, "reschedule failed; keeping last rendered entry");
                    if let Some(entry) = previous.active_entry(self.clock.now()) {
                        self.emit_entry("fallback", entry)?;
                    }
                    return Ok(());
                }
            };
            self.emit(&json!({ "timeline": &timeline }))?;

            if cycle == refresh_cycles {
                if let Some(entry) = timeline.active_entry(self.clock.now()) {
                    self.emit_entry("active", entry)?;
                }
                break;
            }

            for entry in &timeline.entries {
                self.clock.sleep_until(entry.timestamp).await;
                self.emit_entry("active", entry)?;
            }
            if let Some(refresh_at) = timeline.refresh_at() {
                self.clock.sleep_until(refresh_at).await;
            }
            previous = Some(timeline);
        }
        Ok(())
    }

    pub fn emit_entry(&mut self, kind: &str, entry: &TimelineEntry) -> AppResult<()> {
        let layouts = SizeClass::ALL
            .iter()
            .map(|size| json!({ "size": size.as_str(), "layout": render_entry(entry, *size) }))
            .collect::<Vec<_>>();
        tracing::debug!(
            kind,
            metric = entry.active_metric.as_str(),
            timestamp = %entry.timestamp,
            "widget entry rendered"
        );
        self.emit(&json!({
            "entry": kind,
            "timestamp": entry.timestamp,
            "metric": entry.active_metric.as_str(),
            "value": entry.display_value(),
            "layouts": layouts,
        }))
    }

    pub fn emit(&mut self, value: &serde_json::Value) -> AppResult<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, SleepFuture, WidgetDriver};
    use crate::host::DashboardHost;
    use crate::models::{ColorTheme, DisplayConfiguration, DisplayMode, Timeline};
    use crate::provider::SampleMetricsProvider;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::{Arc, Mutex};

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn starting_at(now: DateTime<Utc>) -> Self {
            Self { now: Mutex::new(now) }
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().expect("clock lock")
        }

        fn sleep_until(&self, at: DateTime<Utc>) -> SleepFuture<'_> {
            let mut now = self.now.lock().expect("clock lock");
            if at > *now {
                *now = at;
            }
            Box::pin(async {})
        }
    }

    fn host() -> DashboardHost {
        DashboardHost::new(Arc::new(SampleMetricsProvider::new()), std::time::Duration::from_secs(1))
    }

    fn records(out: Vec<u8>) -> Vec<serde_json::Value> {
        String::from_utf8(out)
            .expect("utf8 output")
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect()
    }

    fn timelines(records: &[serde_json::Value]) -> Vec<Timeline> {
        records
            .iter()
            .filter_map(|record| record.get("timeline"))
            .map(|value| serde_json::from_value(value.clone()).expect("timeline record"))
            .collect()
    }

    fn entry_kinds(records: &[serde_json::Value]) -> Vec<String> {
        records
            .iter()
            .filter_map(|record| record.get("entry").and_then(|kind| kind.as_str()))
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn reschedules_when_the_timeline_ends() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 16, 8, 0).single().expect("valid time");
        let host = host();
        let mut driver = WidgetDriver::new(&host, ManualClock::starting_at(start), Vec::new());
        let configuration = DisplayConfiguration::new(DisplayMode::Alternating, ColorTheme::Blue);
        driver.run(configuration, 1).await.expect("driver run");

        let records = records(driver.into_inner());
        let timelines = timelines(&records);
        assert_eq!(timelines.len(), 2);
        assert_eq!(timelines[0].generated_at, start);
        assert_eq!(Some(timelines[1].generated_at), timelines[0].refresh_at());
        assert_eq!(timelines[1].generated_at, start + Duration::seconds(60));
        assert_eq!(entry_kinds(&records), vec!["active"; 4]);

        let played = records
            .iter()
            .filter(|record| record.get("entry").is_some())
            .map(|record| record["metric"].as_str().expect("metric").to_string())
            .collect::<Vec<_>>();
        assert_eq!(played, vec!["customers", "tasks", "customers", "customers"]);
    }

    #[tokio::test]
    async fn zero_cycles_renders_only_the_current_entry() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).single().expect("valid time");
        let host = host();
        let mut driver = WidgetDriver::new(&host, ManualClock::starting_at(start), Vec::new());
        let configuration = DisplayConfiguration::new(DisplayMode::TasksOnly, ColorTheme::Green);
        driver.run(configuration, 0).await.expect("driver run");

        let records = records(driver.into_inner());
        assert_eq!(timelines(&records).len(), 1);
        assert_eq!(entry_kinds(&records), vec!["active"]);
        assert_eq!(records[1]["value"], "8");
        let sizes = records[1]["layouts"]
            .as_array()
            .expect("layouts")
            .iter()
            .map(|layout| layout["size"].as_str().expect("size"))
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec!["small", "medium", "large"]);
    }

    #[tokio::test]
    async fn failed_reschedule_keeps_the_last_entry_once() {
        let start = DateTime::<Utc>::MAX_UTC - Duration::seconds(60);
        let host = host();
        let mut driver = WidgetDriver::new(&host, ManualClock::starting_at(start), Vec::new());
        driver
            .run(DisplayConfiguration::default(), 3)
            .await
            .expect("fallback is not an error");

        let records = records(driver.into_inner());
        assert_eq!(timelines(&records).len(), 1);
        assert_eq!(entry_kinds(&records), vec!["active", "active", "active", "fallback"]);
        let fallback = records.last().expect("fallback record");
        assert_eq!(fallback["metric"], "customers");
    }

    #[tokio::test]
    async fn first_schedule_failure_propagates() {
        let host = host();
        let mut driver = WidgetDriver::new(&host, ManualClock::starting_at(DateTime::<Utc>::MAX_UTC), Vec::new());
        assert!(driver.run(DisplayConfiguration::default(), 1).await.is_err());
        assert!(driver.into_inner().is_empty());
    }
}
