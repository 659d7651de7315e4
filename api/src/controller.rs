use chart::{transform, ChartConfig, ChartRenderer};
use common::{
    config::{CurrencyConfig, DisplayConfig},
    models::{CurrencyPair, Preferences},
    Error, Result,
};
use connectors::QuoteSource;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use store::PreferenceStore;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::view::{advance_dots, FormModel, Screen, ViewModel, ViewState};

const LOADER_TICK: Duration = Duration::from_millis(200);

/// Drives the fetch, transform and render cycle behind the selection form
pub struct ViewController {
    /// Source of price history
    quotes: Arc<dyn QuoteSource>,
    /// Persisted user selections
    preferences: Arc<PreferenceStore>,
    currencies: CurrencyConfig,
    renderer: Mutex<ChartRenderer>,
    screen: Arc<RwLock<Screen>>,
    /// Handle of the running loader animation, at most one
    loader_tick: StdMutex<Option<JoinHandle<()>>>,
    /// Held for the whole of a cycle so submissions run one after another
    cycle: Mutex<()>,
}

impl ViewController {
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        preferences: Arc<PreferenceStore>,
        display: DisplayConfig,
    ) -> Self {
        let screen = Screen {
            state: ViewState::Idle,
            form: FormModel::from(display.default_preferences()),
            loader_dots: String::new(),
        };

        Self {
            quotes,
            preferences,
            currencies: display.currencies,
            renderer: Mutex::new(ChartRenderer::new(display.chart)),
            screen: Arc::new(RwLock::new(screen)),
            loader_tick: StdMutex::new(None),
            cycle: Mutex::new(()),
        }
    }

    /// Restore the stored selection into the form and load the first chart
    pub async fn init(&self) -> ViewState {
        let prefs = self.preferences.get().await;
        debug!(
            "Restoring selection {}/{} (auto-apply: {})",
            prefs.crypto, prefs.fiat, prefs.auto_apply
        );

        let auto_apply = prefs.auto_apply;
        self.screen.write().await.form = FormModel::from(prefs);

        if let Err(e) = self.preferences.set_auto_apply(auto_apply).await {
            warn!("Failed to persist auto-apply flag: {}", e);
        }

        self.run_cycle().await
    }

    /// Submit button pressed.
    ///
    /// Refused while a cycle holds the form and while auto-apply stands in for
    /// the button.
    pub async fn submit(&self) -> Result<ViewState> {
        {
            let screen = self.screen.read().await;
            ensure_form_enabled(&screen)?;
            if screen.form.auto_apply {
                return Err(Error::Conflict(
                    "Submit is disabled while auto-apply is on".to_string(),
                ));
            }
        }

        Ok(self.run_cycle().await)
    }

    /// Run one update cycle for the values currently in the form
    async fn run_cycle(&self) -> ViewState {
        let _cycle = self.cycle.lock().await;

        let form = self.screen.read().await.form.clone();
        let pair = CurrencyPair::new(
            self.currencies.normalize_fiat(Some(&form.fiat)),
            self.currencies.normalize_crypto(Some(&form.crypto)),
        );

        info!("Updating chart for {}", pair);
        self.enter_loading().await;

        let state = match self.update_chart(&pair).await {
            Ok(points) => {
                debug!("Chart for {} drawn with {} points", pair, points);

                if let Err(e) = self
                    .preferences
                    .set(&form.fiat, &form.crypto, form.auto_apply)
                    .await
                {
                    warn!("Failed to persist selection: {}", e);
                }

                ViewState::Loaded
            }
            Err(e) => {
                error!("Chart update for {} failed: {}", pair, e);
                ViewState::Errored {
                    message: error_message(&e),
                }
            }
        };

        self.hide_loader();
        self.screen.write().await.state = state.clone();

        state
    }

    /// Fiat select changed. Runs a cycle when auto-apply is on.
    pub async fn select_fiat(&self, value: &str) -> Result<Option<ViewState>> {
        let auto_apply = {
            let mut screen = self.screen.write().await;
            ensure_form_enabled(&screen)?;
            screen.form.fiat = value.to_string();
            screen.form.auto_apply
        };

        Ok(self.apply_if_enabled(auto_apply).await)
    }

    /// Crypto select changed. Runs a cycle when auto-apply is on.
    pub async fn select_crypto(&self, value: &str) -> Result<Option<ViewState>> {
        let auto_apply = {
            let mut screen = self.screen.write().await;
            ensure_form_enabled(&screen)?;
            screen.form.crypto = value.to_string();
            screen.form.auto_apply
        };

        Ok(self.apply_if_enabled(auto_apply).await)
    }

    /// Auto-apply checkbox changed; the chart is left as it is
    pub async fn set_auto_apply(&self, checked: bool) -> Result<Preferences> {
        {
            let mut screen = self.screen.write().await;
            ensure_form_enabled(&screen)?;
            screen.form.auto_apply = checked;
        }
        debug!("Auto-apply {}", if checked { "enabled" } else { "disabled" });

        self.preferences.set_auto_apply(checked).await
    }

    pub async fn view(&self) -> ViewModel {
        let screen = self.screen.read().await.clone();
        let chart = if screen.state.chart_visible() {
            self.chart().await
        } else {
            None
        };

        ViewModel::new(screen, chart)
    }

    /// Configuration of the chart currently drawn
    pub async fn chart(&self) -> Option<ChartConfig> {
        self.renderer
            .lock()
            .await
            .current()
            .map(|chart| chart.config().clone())
    }

    pub fn currencies(&self) -> &CurrencyConfig {
        &self.currencies
    }

    /// Whether the loader animation task is alive
    #[cfg(test)]
    pub fn loader_running(&self) -> bool {
        self.loader_slot()
            .as_ref()
            .map_or(false, |tick| !tick.is_finished())
    }

    async fn apply_if_enabled(&self, auto_apply: bool) -> Option<ViewState> {
        if !auto_apply {
            return None;
        }

        Some(self.run_cycle().await)
    }

    async fn update_chart(&self, pair: &CurrencyPair) -> Result<usize> {
        let observations = self.quotes.get_time_series(pair).await?;
        let dataset = transform(&observations);

        let mut renderer = self.renderer.lock().await;
        let chart = renderer.create(dataset, &pair.fiat)?;

        Ok(chart.config().data.labels.len())
    }

    async fn enter_loading(&self) {
        self.renderer.lock().await.destroy();

        {
            let mut screen = self.screen.write().await;
            screen.state = ViewState::Loading;
            screen.loader_dots.clear();
        }

        self.show_loader();
    }

    fn show_loader(&self) {
        let screen = self.screen.clone();
        let tick = tokio::spawn(async move {
            let mut interval = tokio::time::interval(LOADER_TICK);
            // the first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                advance_dots(&mut screen.write().await.loader_dots);
            }
        });

        if let Some(previous) = self.loader_slot().replace(tick) {
            previous.abort();
        }
    }

    fn hide_loader(&self) {
        if let Some(tick) = self.loader_slot().take() {
            tick.abort();
        }
    }

    fn loader_slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.loader_tick
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ViewController {
    fn drop(&mut self) {
        self.hide_loader();
    }
}

fn ensure_form_enabled(screen: &Screen) -> Result<()> {
    if screen.state.form_enabled() {
        Ok(())
    } else {
        Err(Error::Conflict(
            "The form is disabled while the chart is loading".to_string(),
        ))
    }
}

fn error_message(err: &Error) -> String {
    format!(
        "There was an error: {}. Please try again or reload the page.",
        err
    )
}
