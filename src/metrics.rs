//! Run metrics.
//!
//! A [`MetricsCollector`] gathers named metrics while a matching run executes and can
//! print them or save them as JSON afterwards.
//!
//! ```no_run
//! use user_matcher::metrics::{CounterMetric, MetricsCollector};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut metrics = MetricsCollector::new();
//! metrics.record_start();
//! metrics.register(Box::new(CounterMetric::with_value("rows_read", 4)));
//! metrics.record_end();
//! metrics.print();
//! metrics.save_to_file("metrics.json")?;
//! # Ok(())
//! # }
//! ```

use crate::engine::GroupingStats;
use crate::matching_type::MatchingType;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// A named value reported at the end of a run.
pub trait Metric: Send + Sync {
    fn name(&self) -> &str;

    fn value(&self) -> Value;

    fn description(&self) -> Option<&str> {
        None
    }
}

/// A monotonically increasing count.
pub struct CounterMetric {
    name: String,
    count: u64,
    description: Option<String>,
}

impl CounterMetric {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, 0)
    }

    pub fn with_value(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Metric for CounterMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.count)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Metrics of one run, keyed by name.
#[derive(Default)]
pub struct MetricsCollector {
    metrics: BTreeMap<String, Box<dyn Metric>>,
    start_time: Option<Instant>,
    end_time: Option<Instant>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric, replacing any metric of the same name.
    pub fn register(&mut self, metric: Box<dyn Metric>) {
        self.metrics.insert(metric.name().to_string(), metric);
    }

    pub fn record_start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn record_end(&mut self) {
        self.end_time = Some(Instant::now());
    }

    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }

    /// Register the counters of a grouping pass.
    pub fn record_grouping(&mut self, stats: &GroupingStats) {
        self.register(Box::new(
            CounterMetric::with_value("rows_read", stats.rows as u64)
                .with_description("Data rows read from the input"),
        ));
        self.register(Box::new(
            CounterMetric::with_value("groups_created", stats.groups as u64)
                .with_description("Distinct UserId values assigned"),
        ));
        for t in MatchingType::ALL {
            if let Some(&n) = stats.matched_by.get(&t) {
                self.register(Box::new(
                    CounterMetric::with_value(format!("matched_by_{t}"), n as u64)
                        .with_description(format!("Rows that joined an earlier group by {t}")),
                ));
            }
            if let Some(&n) = stats.identifiers.get(&t) {
                self.register(Box::new(
                    CounterMetric::with_value(format!("identifiers_{t}"), n as u64)
                        .with_description(format!("Distinct normalized {t} identifiers")),
                ));
            }
        }
    }

    /// Current value of the metric called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.metrics.get(name).map(|m| m.value())
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out = serde_json::Map::new();
        for (name, metric) in &self.metrics {
            let mut obj = serde_json::Map::new();
            obj.insert("value".to_string(), metric.value());
            if let Some(desc) = metric.description() {
                obj.insert("description".to_string(), json!(desc));
            }
            out.insert(name.clone(), Value::Object(obj));
        }
        if let Some(elapsed) = self.elapsed() {
            out.insert(
                "execution_time_ms".to_string(),
                json!({
                    "value": elapsed.as_millis() as u64,
                    "description": "Total run time in milliseconds",
                }),
            );
        }
        Value::Object(out)
    }

    /// Print all metrics to stdout.
    pub fn print(&self) {
        println!("\n========== Matching Metrics ==========");
        if let Some(elapsed) = self.elapsed() {
            println!(
                "Execution Time: {:.3}s ({} ms)",
                elapsed.as_secs_f64(),
                elapsed.as_millis()
            );
            println!("--------------------------------------");
        }
        for (name, metric) in &self.metrics {
            match metric.description() {
                Some(desc) => println!("{name}: {} ({desc})", metric.value()),
                None => println!("{name}: {}", metric.value()),
            }
        }
        println!("======================================\n");
    }

    /// Save all metrics to `path` as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let formatted = serde_json::to_string_pretty(&self.to_json())?;
        file.write_all(formatted.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}
