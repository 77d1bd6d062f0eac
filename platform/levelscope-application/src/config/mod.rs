use crate::analysis::{AnalysisOptions, LayoutOptions};
use levelscope_domain::services::extrema::PeakSearch;
use levelscope_domain::services::labels::{DrawArea, DEFAULT_MIN_SPACING_PX, MIN_SPACING_PX};
use levelscope_domain::services::weekly::{WeeklyWindow, DEFAULT_MAX_WEEKS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_TOP_PX: f64 = 10.0;
pub const DEFAULT_BOTTOM_PX: f64 = 590.0;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub history: Option<HistoryConfig>,
    pub peak: Option<PeakConfig>,
    pub weekly: Option<WeeklyConfig>,
    pub layout: Option<LayoutConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Trailing calendar months kept before the last bar. Omit to keep everything.
    pub months: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PeakConfig {
    pub max_lookahead: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct WeeklyConfig {
    pub enabled: Option<bool>,
    pub max_weeks: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    pub min_spacing_px: Option<f64>,
    pub top_px: Option<f64>,
    pub bottom_px: Option<f64>,
}

impl Config {
    pub fn analysis_options(&self) -> AnalysisOptions {
        let history_months = self.history.as_ref().and_then(|h| h.months);
        let peak_search = match self.peak.as_ref().and_then(|p| p.max_lookahead) {
            Some(bars) => PeakSearch::within(bars),
            None => PeakSearch::unbounded(),
        };
        let weekly = self
            .weekly
            .as_ref()
            .filter(|w| w.enabled.unwrap_or(false))
            .map(|w| WeeklyWindow {
                max_weeks: w.max_weeks.unwrap_or(DEFAULT_MAX_WEEKS),
                as_of: None,
            });
        AnalysisOptions {
            history_months,
            peak_search,
            weekly,
        }
    }

    pub fn layout_options(&self) -> Result<LayoutOptions, String> {
        let layout = self.layout.as_ref();
        let top = layout.and_then(|l| l.top_px).unwrap_or(DEFAULT_TOP_PX);
        let bottom = layout.and_then(|l| l.bottom_px).unwrap_or(DEFAULT_BOTTOM_PX);
        let min_spacing_px = layout
            .and_then(|l| l.min_spacing_px)
            .unwrap_or(DEFAULT_MIN_SPACING_PX);
        if !min_spacing_px.is_finite() || min_spacing_px < MIN_SPACING_PX {
            return Err(format!(
                "layout.min_spacing_px must be >= {MIN_SPACING_PX}, got {min_spacing_px}"
            ));
        }
        let area = DrawArea::new(top, bottom).map_err(|err| format!("invalid [layout]: {err}"))?;
        Ok(LayoutOptions {
            area,
            min_spacing_px,
        })
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let (config, _source) = load_config_with_source(path)?;
    Ok(config)
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    Ok((config, contents))
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}
