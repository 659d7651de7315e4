use common::{config::ChartStyle, models::ChartDataset, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CurrencyFormatter;

const SERIES_LABEL: &str = "Price";
const NUMBER_LOCALE: &str = "en-US";
const WHEEL_ZOOM_SPEED: f64 = 0.03;
const AXIS_TITLE_FONT_SIZE: u32 = 16;

/// Line-chart description handed to the front end for drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<LineDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub tension: f64,
    pub fill: bool,
    pub border_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub scales: Scales,
    pub plugins: Plugins,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: AxisTitle,
    pub ticks: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
    pub align: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticks {
    pub format: NumberFormat,
}

/// Intl-style number format options used for ticks and tooltips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub locale: String,
    pub style: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugins {
    pub zoom: ZoomPlugin,
    pub tooltip: Tooltip,
    pub legend: Display,
    pub title: Display,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomPlugin {
    pub zoom: ZoomOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomOptions {
    pub wheel: WheelZoom,
    pub pinch: Enabled,
    pub drag: DragZoom,
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelZoom {
    pub enabled: bool,
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragZoom {
    pub enabled: bool,
    pub background_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enabled {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Display {
    pub display: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub format: NumberFormat,
}

impl ChartConfig {
    fn line(dataset: ChartDataset, fiat: &str, style: &ChartStyle) -> Self {
        let number_format = NumberFormat {
            locale: NUMBER_LOCALE.to_string(),
            style: "currency".to_string(),
            currency: fiat.to_string(),
        };

        Self {
            kind: "line".to_string(),
            data: ChartData {
                labels: dataset.labels,
                datasets: vec![LineDataset {
                    label: SERIES_LABEL.to_string(),
                    data: dataset.values,
                    tension: style.tension,
                    fill: false,
                    border_color: style.line_color.clone(),
                }],
            },
            options: ChartOptions {
                scales: Scales {
                    y: Axis {
                        title: AxisTitle {
                            display: true,
                            text: format!("Price in {}", fiat),
                            align: "center".to_string(),
                            font: Font {
                                size: AXIS_TITLE_FONT_SIZE,
                            },
                        },
                        ticks: Ticks {
                            format: number_format.clone(),
                        },
                    },
                },
                plugins: Plugins {
                    zoom: ZoomPlugin {
                        zoom: ZoomOptions {
                            wheel: WheelZoom {
                                enabled: true,
                                speed: WHEEL_ZOOM_SPEED,
                            },
                            pinch: Enabled { enabled: false },
                            drag: DragZoom {
                                enabled: true,
                                background_color: style.drag_bg_color.clone(),
                            },
                            mode: "x".to_string(),
                        },
                    },
                    tooltip: Tooltip {
                        format: number_format,
                    },
                    legend: Display { display: false },
                    title: Display { display: false },
                },
            },
        }
    }
}

/// A drawn chart
#[derive(Debug, Clone)]
pub struct Chart {
    id: u64,
    config: ChartConfig,
    formatter: CurrencyFormatter,
}

impl Chart {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Y-axis tick text for a value
    pub fn format_tick(&self, value: f64) -> String {
        self.formatter.format(value)
    }

    /// Tooltip text for a point of the price series
    pub fn tooltip_label(&self, value: Option<f64>) -> String {
        let label = self
            .config
            .data
            .datasets
            .first()
            .map(|dataset| dataset.label.as_str())
            .unwrap_or_default();
        self.formatter.tooltip_label(label, value)
    }
}

/// Owns the single live chart instance
pub struct ChartRenderer {
    style: ChartStyle,
    current: Option<Chart>,
    next_id: u64,
    destroyed: u64,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self {
            style,
            current: None,
            next_id: 1,
            destroyed: 0,
        }
    }

    /// Replace the live chart with one drawing `dataset` priced in `fiat`
    pub fn create(&mut self, dataset: ChartDataset, fiat: &str) -> Result<&Chart> {
        self.destroy();

        if dataset.labels.len() != dataset.values.len() {
            return Err(Error::ChartError(format!(
                "Dataset has {} labels but {} values",
                dataset.labels.len(),
                dataset.values.len()
            )));
        }

        let formatter = CurrencyFormatter::new(fiat)?;
        let config = ChartConfig::line(dataset, formatter.code(), &self.style);

        let chart = Chart {
            id: self.next_id,
            config,
            formatter,
        };
        self.next_id += 1;

        debug!(
            "Created chart #{} with {} points in {}",
            chart.id,
            chart.config.data.labels.len(),
            chart.formatter.code()
        );

        Ok(&*self.current.insert(chart))
    }

    /// Drop the live chart, if any. Returns whether one existed.
    pub fn destroy(&mut self) -> bool {
        match self.current.take() {
            Some(chart) => {
                debug!("Destroyed chart #{}", chart.id);
                self.destroyed += 1;
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&Chart> {
        self.current.as_ref()
    }

    /// Number of chart instances torn down so far
    pub fn destroyed_count(&self) -> u64 {
        self.destroyed
    }
}
