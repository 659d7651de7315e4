use chart::ChartConfig;
use common::models::Preferences;
use serde::Serialize;

/// Where the chart panel is in its fetch-render cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    Loading,
    Loaded,
    Errored { message: String },
}

impl ViewState {
    pub fn loader_visible(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn chart_visible(&self) -> bool {
        matches!(self, ViewState::Loaded)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Errored { message } => Some(message),
            _ => None,
        }
    }

    /// The form is locked only while a cycle is in flight
    pub fn form_enabled(&self) -> bool {
        !self.loader_visible()
    }
}

/// Current values of the selection form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormModel {
    pub fiat: String,
    pub crypto: String,
    pub auto_apply: bool,
}

impl From<Preferences> for FormModel {
    fn from(prefs: Preferences) -> Self {
        Self {
            fiat: prefs.fiat,
            crypto: prefs.crypto,
            auto_apply: prefs.auto_apply,
        }
    }
}

/// Mutable screen state owned by the controller
#[derive(Debug, Clone)]
pub(crate) struct Screen {
    pub state: ViewState,
    pub form: FormModel,
    pub loader_dots: String,
}

/// Serializable snapshot of everything a front end needs to draw
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub state: ViewState,
    pub form: FormView,
    /// Animated dots of the loading indicator, present while loading
    pub loader: Option<String>,
    pub chart: Option<ChartConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub fiat: String,
    pub crypto: String,
    pub auto_apply: bool,
    pub enabled: bool,
    pub submit_enabled: bool,
}

impl ViewModel {
    pub(crate) fn new(screen: Screen, chart: Option<ChartConfig>) -> Self {
        let enabled = screen.state.form_enabled();
        let loader = screen
            .state
            .loader_visible()
            .then_some(screen.loader_dots);
        let chart = if screen.state.chart_visible() { chart } else { None };

        Self {
            form: FormView {
                fiat: screen.form.fiat,
                crypto: screen.form.crypto,
                auto_apply: screen.form.auto_apply,
                enabled,
                // auto-apply replaces the explicit submit button
                submit_enabled: enabled && !screen.form.auto_apply,
            },
            state: screen.state,
            loader,
            chart,
        }
    }
}

/// Next frame of the loading dots animation
pub(crate) fn advance_dots(dots: &mut String) {
    if dots.len() >= 3 {
        dots.clear();
    } else {
        dots.push('.');
    }
}
