//! Batch runtime: one run evaluates every configured instrument once.

use crate::config::AppConfig;
use crate::db::{JsonFileStateStore, StateStore};
use crate::error::{AlertError, SetupError};
use crate::jobs::context::JobContext;
use crate::jobs::handlers::handle_evaluate_instrument;
use crate::jobs::types::{EvaluateInstrumentJob, InstrumentOutcome, InstrumentReport};
use crate::models::state::StateRecord;
use crate::report::{render_table, ChartRenderer, ChartSeries, RsiChart, SummaryRow, SvgChartRenderer};
use crate::services::notifier::{LogNotifier, NotificationSink};
use crate::services::telegram::TelegramNotifier;
use crate::services::yahoo::YahooPriceProvider;
use crate::services::PriceProvider;
use crate::signals::engine::{AlertEngine, AlertPolicy};
use chrono::{NaiveDate, Utc};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Result of one completed run.
#[derive(Debug)]
pub struct RunSummary {
    /// One report per configured instrument, in configuration order.
    pub reports: Vec<InstrumentReport>,
    /// The record as saved at the end of the run.
    pub record: StateRecord,
    pub chart_delivered: bool,
}

impl RunSummary {
    pub fn notifications_sent(&self) -> usize {
        self.reports.iter().filter(|r| r.notified()).count()
    }

    pub fn delivery_failures(&self) -> usize {
        self.reports.iter().filter(|r| r.delivery_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.reports.iter().filter(|r| r.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.is_failed()).count()
    }

    pub fn report(&self, symbol: &str) -> Option<&InstrumentReport> {
        self.reports.iter().find(|r| r.instrument.symbol == symbol)
    }
}

pub struct AlertRuntime {
    config: Arc<AppConfig>,
    context: Arc<JobContext>,
    store: Arc<dyn StateStore>,
    chart_renderer: Option<Arc<dyn ChartRenderer>>,
}

impl AlertRuntime {
    pub fn new(config: Arc<AppConfig>, context: Arc<JobContext>, store: Arc<dyn StateStore>) -> Self {
        Self {
            config,
            context,
            store,
            chart_renderer: None,
        }
    }

    pub fn with_chart_renderer(mut self, renderer: Arc<dyn ChartRenderer>) -> Self {
        self.chart_renderer = Some(renderer);
        self
    }

    /// Wire the production collaborators described by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, SetupError> {
        let provider: Arc<dyn PriceProvider + Send + Sync> = Arc::new(
            YahooPriceProvider::new(config.price_api_url.clone(), config.request_timeout)?
                .with_retry(config.fetch_max_retries, config.fetch_retry_delay),
        );

        let (notifier, destination) = match &config.telegram {
            Some(telegram) => {
                let notifier: Arc<dyn NotificationSink + Send + Sync> = Arc::new(TelegramNotifier::new(
                    telegram.api_url.clone(),
                    telegram.token.clone(),
                    config.request_timeout,
                )?);
                (notifier, telegram.chat_id.clone())
            }
            None => {
                warn!("TELEGRAM_TOKEN/TELEGRAM_CHAT_ID not set, notifications will only be logged");
                let notifier: Arc<dyn NotificationSink + Send + Sync> = Arc::new(LogNotifier);
                (notifier, "log".to_string())
            }
        };

        let engine = AlertEngine::new(AlertPolicy::from(&config));
        let context = JobContext::new(provider, notifier, destination, engine)
            .with_lookback_days(config.lookback_days)
            .with_delivery_timeout(config.request_timeout);
        let store: Arc<dyn StateStore> = Arc::new(JsonFileStateStore::new(config.state_file.clone()));

        let mut runtime = Self::new(Arc::new(config), Arc::new(context), store);
        if runtime.config.chart.enabled {
            runtime = runtime.with_chart_renderer(Arc::new(SvgChartRenderer::default()));
        }
        Ok(runtime)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the batch with today's date as the end of the price window.
    pub async fn run_once(&self) -> Result<RunSummary, AlertError> {
        self.run_once_at(Utc::now().date_naive()).await
    }

    /// Run the batch for a price window ending on `end_date`.
    ///
    /// The state record is read once before any evaluation and saved once
    /// after all of them finish. Only a failed save fails the run.
    pub async fn run_once_at(&self, end_date: NaiveDate) -> Result<RunSummary, AlertError> {
        let started = Instant::now();
        let snapshot = self.store.load_or_default();
        let concurrency = self.config.worker_concurrency.max(1);

        info!(
            instruments = self.config.instruments.len(),
            concurrency = concurrency,
            known_states = snapshot.len(),
            "AlertRuntime: starting run for {} instruments",
            self.config.instruments.len()
        );

        let jobs: Vec<EvaluateInstrumentJob> = self
            .config
            .instruments
            .iter()
            .map(|instrument| EvaluateInstrumentJob {
                instrument: instrument.clone(),
                prior: snapshot.get(&instrument.symbol),
                end_date,
            })
            .collect();

        // `buffered` keeps configuration order in the output regardless of completion order
        let reports: Vec<InstrumentReport> = stream::iter(jobs)
            .map(|job| {
                let context = self.context.clone();
                async move { handle_evaluate_instrument(job, &context).await }
            })
            .buffered(concurrency)
            .collect()
            .await;

        // keys are disjoint per report, so applying them in any order gives the same record
        let mut record = snapshot;
        for report in &reports {
            if let Some(state) = report.next_state {
                record.set(report.instrument.symbol.clone(), state);
            }
        }

        let chart_delivered = match &self.chart_renderer {
            Some(renderer) => self.publish_chart(renderer.as_ref(), &reports).await,
            None => false,
        };

        if let Err(e) = self.store.save(&record) {
            error!(error = %e, "AlertRuntime: failed to persist state, transitions from this run are lost");
            return Err(AlertError::Persistence(e));
        }

        let summary = RunSummary {
            reports,
            record,
            chart_delivered,
        };
        info!(
            notifications = summary.notifications_sent(),
            delivery_failures = summary.delivery_failures(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "AlertRuntime: run complete"
        );
        Ok(summary)
    }

    /// Render and send the RSI chart. Failures are logged, never propagated.
    async fn publish_chart(&self, renderer: &dyn ChartRenderer, reports: &[InstrumentReport]) -> bool {
        let chart = self.build_chart(reports);
        if !chart.has_data() {
            info!("AlertRuntime: no RSI history for chart instruments, skipping chart");
            return false;
        }

        let path = &self.config.chart.path;
        if let Err(e) = renderer.render(&chart, path) {
            warn!(error = %e, path = %path.display(), "AlertRuntime: failed to render chart");
            return false;
        }

        let send = self.context.notifier.send_image(&self.context.destination, path, &self.config.chart.caption);
        match tokio::time::timeout(self.context.delivery_timeout, send).await {
            Ok(Ok(())) => {
                info!(path = %path.display(), "AlertRuntime: chart delivered");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "AlertRuntime: chart delivery failed");
                false
            }
            Err(_) => {
                warn!(timeout = ?self.context.delivery_timeout, "AlertRuntime: chart delivery timed out");
                false
            }
        }
    }

    fn build_chart(&self, reports: &[InstrumentReport]) -> RsiChart {
        let rows: Vec<SummaryRow> = reports
            .iter()
            .filter_map(|report| {
                let snapshot = report.snapshot.as_ref()?;
                match &report.outcome {
                    InstrumentOutcome::Classified { decision, .. } => Some(SummaryRow {
                        name: report.instrument.name.clone(),
                        close: snapshot.close,
                        rsi: Some(decision.rsi),
                        macd_histogram: snapshot.macd_histogram,
                        state: Some(decision.state),
                    }),
                    InstrumentOutcome::Skipped(AlertError::IndeterminateIndicator { .. }) => Some(SummaryRow {
                        name: report.instrument.name.clone(),
                        close: snapshot.close,
                        rsi: None,
                        macd_histogram: snapshot.macd_histogram,
                        state: None,
                    }),
                    _ => None,
                }
            })
            .collect();

        let series = self
            .config
            .chart
            .symbols
            .iter()
            .filter_map(|symbol| reports.iter().find(|r| &r.instrument.symbol == symbol))
            .filter(|report| report.state().is_some())
            .filter_map(|report| {
                let history = report.rsi_history.as_ref()?;
                Some(ChartSeries {
                    name: report.instrument.name.clone(),
                    points: history.defined_points().collect(),
                })
            })
            .collect();

        RsiChart {
            title: self.config.chart.caption.clone(),
            series,
            thresholds: self.config.thresholds,
            table: render_table(&rows),
        }
    }
}
