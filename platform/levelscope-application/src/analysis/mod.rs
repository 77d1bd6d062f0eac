use levelscope_domain::errors::LevelError;
use levelscope_domain::repositories::market_data::{BarQuery, MarketDataRepository};
use levelscope_domain::services::extrema::{detect_extrema, PeakSearch};
use levelscope_domain::services::fibonacci::fibonacci_levels;
use levelscope_domain::services::gann::{gann_levels, GannPath};
use levelscope_domain::services::labels::{layout_labels, DrawArea, LinearPriceAxis, PriceAxis};
use levelscope_domain::services::normalizer::{normalize, NormalizationReport};
use levelscope_domain::services::reference::reference_levels;
use levelscope_domain::services::signals::{
    classify_touch, detect_weekly_breakout, LevelTouch, WeeklyBreakout,
};
use levelscope_domain::services::weekly::{aggregate_weekly, WeeklyWindow};
use levelscope_domain::services::window::trailing_window;
use levelscope_domain::value_objects::bar::WeeklyBar;
use levelscope_domain::value_objects::extremum::Extrema;
use levelscope_domain::value_objects::label::LabelPlacement;
use levelscope_domain::value_objects::level::Level;
use levelscope_domain::value_objects::raw_bar::RawBar;
use levelscope_domain::value_objects::series::Series;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisOptions {
    /// `None` analyses the whole series.
    pub history_months: Option<u32>,
    pub peak_search: PeakSearch,
    /// `None` skips weekly aggregation and the weekly breakout check.
    pub weekly: Option<WeeklyWindow>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub area: DrawArea,
    pub min_spacing_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartAnalysis {
    pub series: Series,
    pub report: NormalizationReport,
    pub extrema: Extrema,
    pub gann: GannPath,
    /// Reference lines, then Gann, then Fibonacci.
    pub levels: Vec<Level>,
    pub weekly: Option<Vec<WeeklyBar>>,
    /// Last daily bar against the Gann and Fibonacci levels.
    pub touch: Option<LevelTouch>,
    pub weekly_breakout: Option<WeeklyBreakout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledChart {
    #[serde(flatten)]
    pub analysis: ChartAnalysis,
    pub labels: Vec<LabelPlacement>,
}

impl ChartAnalysis {
    pub fn place_labels<A: PriceAxis + ?Sized>(
        &self,
        axis: &A,
        min_spacing: f64,
    ) -> Result<Vec<LabelPlacement>, LevelError> {
        layout_labels(&self.levels, axis, min_spacing)
    }

    /// Linear axis spanning both the bars and every level.
    pub fn fit_axis(&self, area: DrawArea) -> Result<LinearPriceAxis, LevelError> {
        let bar_range = self
            .series
            .price_range()
            .map(|(low, high)| [low, high])
            .into_iter()
            .flatten();
        let level_prices = self.levels.iter().map(|level| level.price);
        LinearPriceAxis::fit(area, bar_range.chain(level_prices))
    }

    pub fn with_labels(self, layout: &LayoutOptions) -> Result<LabeledChart, LevelError> {
        let axis = self.fit_axis(layout.area)?;
        let labels = self.place_labels(&axis, layout.min_spacing_px)?;
        Ok(LabeledChart {
            analysis: self,
            labels,
        })
    }
}

/// Full pass over one symbol's raw bars: normalize, window, extrema, levels
/// and the optional weekly view.
pub fn analyze(raw: &[RawBar], options: &AnalysisOptions) -> Result<ChartAnalysis, LevelError> {
    let span = tracing::info_span!(
        "analyze",
        rows = raw.len(),
        history_months = ?options.history_months,
        max_lookahead = ?options.peak_search.max_lookahead,
        weekly = options.weekly.is_some()
    );
    let _enter = span.enter();
    let started = Instant::now();

    let normalized = normalize(raw)?;
    metrics::histogram!("levelscope.analyze.normalize_ms")
        .record(started.elapsed().as_secs_f64() * 1000.0);
    let report = normalized.report;
    if report.duplicates > 0 {
        tracing::warn!(
            duplicates = report.duplicates,
            first_duplicate = ?report.first_duplicate,
            "duplicate dates in input; keeping the last record for each"
        );
    }
    if report.out_of_order > 0 {
        tracing::debug!(
            out_of_order = report.out_of_order,
            first_out_of_order = ?report.first_out_of_order,
            "input was not sorted by date"
        );
    }

    let series = match options.history_months {
        Some(months) => trailing_window(&normalized.series, months)?,
        None => normalized.series,
    };

    let extrema = detect_extrema(&series, &options.peak_search)?;
    let low = extrema.lowest_low.price;
    let peak = extrema.peak_price();

    let gann = gann_levels(low, peak);
    match gann.path {
        GannPath::Calibrated { delta } => {
            tracing::debug!(low, ?peak, delta, "gann levels calibrated from low->peak leg")
        }
        GannPath::Fallback { scale, reason } => {
            tracing::debug!(low, ?peak, scale, ?reason, "gann levels from fixed fallback offsets")
        }
    }

    let mut levels = reference_levels(&extrema);
    let reference_count = levels.len();
    levels.extend(gann.levels);
    levels.extend(fibonacci_levels(low, peak));

    let touch = series
        .last()
        .and_then(|bar| classify_touch(bar, &levels[reference_count..]));

    let weekly = options
        .weekly
        .as_ref()
        .map(|window| aggregate_weekly(&series, window));
    let weekly_breakout = weekly.as_deref().and_then(detect_weekly_breakout);

    metrics::gauge!("levelscope.analyze.bars").set(series.len() as f64);
    metrics::gauge!("levelscope.analyze.levels").set(levels.len() as f64);
    if let Some(weeks) = &weekly {
        metrics::gauge!("levelscope.analyze.weeks").set(weeks.len() as f64);
    }
    metrics::histogram!("levelscope.analyze.total_ms")
        .record(started.elapsed().as_secs_f64() * 1000.0);

    tracing::info!(
        bars = series.len(),
        levels = levels.len(),
        peak_found = peak.is_some(),
        touch = ?touch.as_ref().map(|t| t.kind),
        weekly_breakout = weekly_breakout.is_some(),
        "analysis complete"
    );

    Ok(ChartAnalysis {
        series,
        report,
        extrema,
        gann: gann.path,
        levels,
        weekly,
        touch,
        weekly_breakout,
    })
}

/// Loads `query.symbol` from `repository` and analyses it.
pub fn analyze_symbol<R: MarketDataRepository + ?Sized>(
    repository: &R,
    query: &BarQuery,
    options: &AnalysisOptions,
) -> Result<ChartAnalysis, String> {
    let span = tracing::info_span!("analyze_symbol", symbol = %query.symbol);
    let _enter = span.enter();

    let raw = repository.load_raw_bars(query)?;
    tracing::debug!(rows = raw.len(), "loaded raw bars");
    analyze(&raw, options).map_err(|err| format!("analysis of {} failed: {}", query.symbol, err))
}
